//! `settlebook-engine` — multi-source daily settlement aggregation.
//!
//! Pure engine crate: receives pre-loaded raw rows, returns per-source
//! and combined reports. No CLI or IO dependencies. Every operation is
//! a stateless function of its input; an upload's output fully replaces
//! whatever that source produced before.

pub mod aggregate;
pub mod catalog;
pub mod date;
pub mod error;
pub mod merge;
pub mod model;
pub mod row;
pub mod source;
pub mod validate;

pub use catalog::SourceCatalog;
pub use error::EngineError;
pub use merge::{combine, totals};
pub use model::{CombinedDailyRecord, DailyRecord, SeriesSet, ShopRecord, SourceReport};
pub use row::{Cell, RawRow};
pub use source::{process, SourceId};
