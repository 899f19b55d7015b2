//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 1       | Universal        | General error (unspecified)              |
//! | 2       | Universal        | CLI usage error (bad args, missing file) |
//! | 3-9     | ingest           | Import/decode/catalog codes              |
//! | 10-19   | store            | Result store codes                       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Ingest (3-9)
// =============================================================================

/// Unknown source selector passed to --source.
pub const EXIT_INGEST_UNKNOWN_SOURCE: u8 = 3;

/// Input file cannot be opened or decoded as a spreadsheet/CSV.
pub const EXIT_INGEST_DECODE: u8 = 4;

/// Catalog file invalid (TOML parse or validation failure).
pub const EXIT_INGEST_CATALOG: u8 = 5;

// =============================================================================
// Store (10-19)
// =============================================================================

/// Result store I/O failure (read, write, or rename).
pub const EXIT_STORE_IO: u8 = 10;
