use chrono::{Days, NaiveDate, NaiveDateTime};

use crate::row::Cell;

/// Canonical calendar date from a raw cell value.
///
/// Two encodings are supported: date-like strings and spreadsheet serial
/// numbers. All inputs are treated as naive dates — the exports carry no
/// time zone.
///
/// `day_offset` shifts the resolved date by whole days. One platform
/// labels a day's settlement with the *following* day's date, so its
/// source passes −1 to attribute money to the day it was earned; the
/// offset is a per-source parameter, never baked in here.
///
/// Unparseable or empty input yields `None`; callers drop the row.
pub fn normalize_date(cell: &Cell, day_offset: i64) -> Option<NaiveDate> {
    let base = match cell {
        Cell::Number(n) => from_serial(*n)?,
        Cell::Text(s) => parse_date_str(s)?,
        Cell::Empty => return None,
    };
    apply_offset(base, day_offset)
}

fn apply_offset(date: NaiveDate, day_offset: i64) -> Option<NaiveDate> {
    if day_offset == 0 {
        return Some(date);
    }
    if day_offset < 0 {
        date.checked_sub_days(Days::new(day_offset.unsigned_abs()))
    } else {
        date.checked_add_days(Days::new(day_offset as u64))
    }
}

/// Parse a date-like string: `2025-10-01`, `2025/10/1`, or either form
/// with a trailing time component. Anything else (header junk like the
/// literal word "日期") fails.
fn parse_date_str(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Resolve a spreadsheet date serial.
///
/// Serial day 0 is 1899-12-31 in the sheet numbering scheme, which also
/// counts 1900 as a leap year. Both quirks cancel into a single −2
/// correction: date = 1900-01-01 + (serial − 2) days. Fractional parts
/// (time of day) are truncated; settlement exports are day-granular.
fn from_serial(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() {
        return None;
    }
    let days = serial.trunc() as i64;
    // Serials below 2 predate the scheme's epoch; treat as malformed.
    if !(2..=2_958_465).contains(&days) {
        return None;
    }
    NaiveDate::from_ymd_opt(1900, 1, 1)?.checked_add_days(Days::new((days - 2) as u64))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    #[test]
    fn iso_string_no_offset() {
        assert_eq!(
            normalize_date(&text("2025-10-02"), 0),
            NaiveDate::from_ymd_opt(2025, 10, 2)
        );
    }

    #[test]
    fn day_offset_shifts_back_one_day() {
        assert_eq!(
            normalize_date(&text("2025-10-02"), -1),
            NaiveDate::from_ymd_opt(2025, 10, 1)
        );
    }

    #[test]
    fn slash_form_and_trailing_time() {
        assert_eq!(
            normalize_date(&text("2025/10/2"), 0),
            NaiveDate::from_ymd_opt(2025, 10, 2)
        );
        assert_eq!(
            normalize_date(&text("2025-10-02 00:00:00"), 0),
            NaiveDate::from_ymd_opt(2025, 10, 2)
        );
    }

    #[test]
    fn serial_matches_equivalent_iso_string() {
        // 45562 is 2024-09-27 under the −2 epoch correction.
        let from_serial = normalize_date(&Cell::Number(45562.0), 0);
        let from_string = normalize_date(&text("2024-09-27"), 0);
        assert_eq!(from_serial, from_string);
        assert!(from_serial.is_some());
    }

    #[test]
    fn serial_epoch_correction() {
        // Serial 2 is the first representable day, 1900-01-01.
        assert_eq!(
            normalize_date(&Cell::Number(2.0), 0),
            NaiveDate::from_ymd_opt(1900, 1, 1)
        );
        assert_eq!(normalize_date(&Cell::Number(1.0), 0), None);
    }

    #[test]
    fn serial_with_time_fraction_truncates() {
        assert_eq!(
            normalize_date(&Cell::Number(45562.73), 0),
            NaiveDate::from_ymd_opt(2024, 9, 27)
        );
    }

    #[test]
    fn serial_respects_day_offset() {
        assert_eq!(
            normalize_date(&Cell::Number(45562.0), -1),
            NaiveDate::from_ymd_opt(2024, 9, 26)
        );
    }

    #[test]
    fn junk_dates_are_none() {
        assert_eq!(normalize_date(&text("日期"), 0), None);
        assert_eq!(normalize_date(&text(""), 0), None);
        assert_eq!(normalize_date(&Cell::Empty, 0), None);
        assert_eq!(normalize_date(&text("2025-13-40"), 0), None);
    }
}
