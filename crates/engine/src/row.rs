use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// A single untyped scalar read from one spreadsheet cell.
///
/// Numbers are kept as numbers so downstream code can tell a date serial
/// from a date string.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

// ---------------------------------------------------------------------------
// RawRow
// ---------------------------------------------------------------------------

/// One row of an export, column values addressable by header label.
///
/// The engine never assumes a fixed column set. Lookups take an ordered
/// list of accepted labels; the first present, non-empty match wins.
/// Missing or unparseable values fall back to `""` / `0.0` — that default
/// policy lives in [`RawRow::text`] and [`RawRow::number`] so it can be
/// tested in isolation.
#[derive(Debug, Clone, Default)]
pub struct RawRow {
    fields: HashMap<String, Cell>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, cell: Cell) {
        self.fields.insert(label.into(), cell);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First non-empty cell among `labels`, in label order.
    pub fn cell<S: AsRef<str>>(&self, labels: &[S]) -> Option<&Cell> {
        labels
            .iter()
            .filter_map(|l| self.fields.get(l.as_ref()))
            .find(|c| !c.is_empty())
    }

    /// String coercion with the default-value policy: absent or empty ⇒ `""`.
    ///
    /// Whole numbers render without a trailing `.0` — shop identifiers
    /// frequently arrive as numeric cells.
    pub fn text<S: AsRef<str>>(&self, labels: &[S]) -> String {
        match self.cell(labels) {
            Some(Cell::Text(s)) => s.trim().to_string(),
            Some(Cell::Number(n)) => format_number(*n),
            _ => String::new(),
        }
    }

    /// Numeric coercion with the default-value policy: absent, empty, or
    /// unparseable ⇒ `0.0`. Text values parse their leading numeric prefix
    /// (`"33.95元"` ⇒ `33.95`), matching how the upstream exports mix
    /// units into amount columns.
    pub fn number<S: AsRef<str>>(&self, labels: &[S]) -> f64 {
        match self.cell(labels) {
            Some(Cell::Number(n)) => *n,
            Some(Cell::Text(s)) => parse_leading_number(s).unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

/// Render a numeric cell as the string a person typed into the sheet.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Parse the leading decimal-number prefix of a string, if any.
fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let mut end = 0;
    let bytes = s.as_bytes();
    if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
        end += 1;
    }
    let mut seen_digit = false;
    let mut seen_dot = false;
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse().ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
