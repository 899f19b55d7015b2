use std::fmt;

#[derive(Debug)]
pub enum EngineError {
    /// Caller asked for a source processor that doesn't exist.
    UnknownSource(String),
    /// TOML parse / deserialization error in a source catalog.
    CatalogParse(String),
    /// Catalog validation error (empty label list, bad day offset, ...).
    CatalogValidation { source: String, message: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownSource(s) => write!(
                f,
                "unknown source: '{s}' (expected fixed-fee, cycle-a, cycle-b, or offline)"
            ),
            Self::CatalogParse(msg) => write!(f, "catalog parse error: {msg}"),
            Self::CatalogValidation { source, message } => {
                write!(f, "source '{source}': {message}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
