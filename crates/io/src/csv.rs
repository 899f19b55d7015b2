// CSV import into the engine's raw-row model.
//
// Same header-labeling rule as the Excel importer, so fixtures and tests
// can avoid binary workbooks. Every CSV field is text; date serials only
// occur in real spreadsheet exports.

use std::path::Path;

use settlebook_engine::{Cell, RawRow};

use crate::xlsx::{header_labels, raw_row};

pub fn import(path: &Path) -> Result<Vec<RawRow>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    import_from_string(&content)
}

pub fn import_from_string(content: &str) -> Result<Vec<RawRow>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let labels = match records.next() {
        Some(header) => {
            let header = header.map_err(|e| e.to_string())?;
            header_labels(header.iter().map(field_cell))
        }
        None => return Ok(Vec::new()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record.map_err(|e| e.to_string())?;
        rows.push(raw_row(&labels, record.iter().map(field_cell)));
    }
    Ok(rows)
}

fn field_cell(field: &str) -> Cell {
    if field.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(field.to_string())
    }
}
