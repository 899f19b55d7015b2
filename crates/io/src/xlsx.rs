// Excel import (xlsx, xls, xlsb, ods) into the engine's raw-row model.
//
// One-way conversion. The first sheet's first row supplies column
// labels; data rows become label-addressable RawRows. Numeric cells stay
// numbers so date serials reach the engine's normalizer intact.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use settlebook_engine::{Cell, RawRow};

/// Import the first sheet of an Excel workbook as raw rows.
///
/// Decoding failure (not a spreadsheet, unreadable file, no sheets) is
/// fatal; malformed rows inside a valid sheet are the engine's business.
pub fn import(path: &Path) -> Result<Vec<RawRow>, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| "Excel file contains no sheets".to_string())?;

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first, e))?;

    let mut rows = range.rows();
    let labels = match rows.next() {
        Some(header) => header_labels(header.iter().map(cell_from_data)),
        None => return Ok(Vec::new()),
    };

    Ok(rows.map(|row| raw_row(&labels, row.iter().map(cell_from_data))).collect())
}

/// Column labels from the header row. A blank header cell names its
/// column positionally as `_{index}` — the same scheme the upstream
/// export tooling uses, which is how merged-header exports end up
/// addressed by `_1` / `_4`.
pub(crate) fn header_labels(header: impl Iterator<Item = Cell>) -> Vec<String> {
    header
        .enumerate()
        .map(|(i, cell)| match cell {
            Cell::Text(s) if !s.trim().is_empty() => s.trim().to_string(),
            Cell::Number(n) => format!("{n}"),
            _ => format!("_{i}"),
        })
        .collect()
}

pub(crate) fn raw_row(labels: &[String], cells: impl Iterator<Item = Cell>) -> RawRow {
    let mut row = RawRow::new();
    for (i, cell) in cells.enumerate() {
        if matches!(cell, Cell::Empty) {
            continue;
        }
        match labels.get(i) {
            Some(label) => row.insert(label.clone(), cell),
            None => row.insert(format!("_{i}"), cell),
        }
    }
    row
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(n) => Cell::Number(*n),
        Data::Int(n) => Cell::Number(*n as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        // Raw serial, same numbering the engine's date normalizer expects.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(_) | Data::Error(_) => Cell::Empty,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    #[test]
    fn import_labels_rows_by_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("export.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "门店ID").unwrap();
        sheet.write_string(0, 1, "结算金额").unwrap();
        sheet.write_string(0, 2, "结算日期").unwrap();
        sheet.write_string(1, 0, "S1").unwrap();
        sheet.write_number(1, 1, 33.95).unwrap();
        sheet.write_string(1, 2, "2025-10-01").unwrap();
        workbook.save(&path).unwrap();

        let rows = import(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(&["门店ID"]), "S1");
        assert_eq!(rows[0].number(&["结算金额"]), 33.95);
        assert_eq!(rows[0].text(&["结算日期"]), "2025-10-01");
    }

    #[test]
    fn blank_header_cells_get_positional_labels() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cycle-b.xlsx");

        // Merged-header export: only column 0 is labeled.
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "代运营账单").unwrap();
        sheet.write_string(1, 0, "2025-10-02").unwrap();
        sheet.write_number(1, 1, 2238.0).unwrap();
        sheet.write_number(1, 4, 150.5).unwrap();
        workbook.save(&path).unwrap();

        let rows = import(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].text(&["_1"]), "2238");
        assert_eq!(rows[0].number(&["_4"]), 150.5);
    }

    #[test]
    fn not_a_spreadsheet_is_fatal() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("junk.xlsx");
        std::fs::write(&path, b"definitely not a workbook").unwrap();
        let err = import(&path).unwrap_err();
        assert!(err.contains("Failed to open Excel file"), "got: {err}");
    }
}
