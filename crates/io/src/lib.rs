// File I/O operations

pub mod csv;
pub mod store;
pub mod xlsx;

use std::path::Path;

use settlebook_engine::RawRow;

/// Import rows from an export file, dispatching on extension.
/// `.csv` goes through the CSV reader; everything else is handed to
/// calamine, which sniffs xlsx/xls/ods itself.
pub fn import_rows(path: &Path) -> Result<Vec<RawRow>, String> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        csv::import(path)
    } else {
        xlsx::import(path)
    }
}
