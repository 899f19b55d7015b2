use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::date::normalize_date;
use crate::row::RawRow;
use crate::source::SourceSpec;

// ---------------------------------------------------------------------------
// Fold targets
// ---------------------------------------------------------------------------

/// Running totals for one calendar day.
#[derive(Debug, Clone, Default)]
pub struct DailyFold {
    pub amount: f64,
    /// Distinct contributing shops. Repeated contributions from the same
    /// shop on the same day count once.
    pub shops: BTreeSet<String>,
}

/// Net settlement for one shop on one day (shop×date grouping).
#[derive(Debug, Clone)]
pub struct ShopDayNet {
    pub shop_id: String,
    pub shop_name: String,
    pub contract_start_date: String,
    pub date: NaiveDate,
    pub net_amount: f64,
}

// ---------------------------------------------------------------------------
// Single-pass folds
// ---------------------------------------------------------------------------

/// Group rows by canonical date, summing amounts and tracking distinct
/// shops. One streaming pass; rows with no usable shop id or date are
/// skipped, as are zero-amount rows for sources whose acceptance rule
/// gates on nonzero.
///
/// Returns the fold plus the number of rows skipped (leading header rows
/// included).
pub fn fold_by_date(spec: &SourceSpec, rows: &[RawRow]) -> (BTreeMap<NaiveDate, DailyFold>, usize) {
    let mut groups: BTreeMap<NaiveDate, DailyFold> = BTreeMap::new();
    let mut skipped = spec.skip_leading_rows.min(rows.len());

    for row in rows.iter().skip(spec.skip_leading_rows) {
        let shop_id = row.text(&spec.columns.shop_id);
        let date = row
            .cell(&spec.columns.date)
            .and_then(|c| normalize_date(c, spec.day_offset));
        let amount = row.number(&spec.columns.amount);

        let (shop_id, date) = match (shop_id, date) {
            (s, Some(d)) if !s.is_empty() => (s, d),
            _ => {
                skipped += 1;
                continue;
            }
        };
        if spec.acceptance.requires_nonzero_rows() && amount == 0.0 {
            skipped += 1;
            continue;
        }

        let entry = groups.entry(date).or_default();
        entry.amount += amount;
        entry.shops.insert(shop_id);
    }

    (groups, skipped)
}

/// Group rows by (shop, canonical date), netting amounts. Shop name and
/// contract start date are captured from the first row of each key.
///
/// Zero amounts are folded, not skipped — a day can net to a standard
/// value through several partial rows.
pub fn fold_by_shop_day(
    spec: &SourceSpec,
    rows: &[RawRow],
) -> (BTreeMap<(String, NaiveDate), ShopDayNet>, usize) {
    let mut groups: BTreeMap<(String, NaiveDate), ShopDayNet> = BTreeMap::new();
    let mut skipped = spec.skip_leading_rows.min(rows.len());

    for row in rows.iter().skip(spec.skip_leading_rows) {
        let shop_id = row.text(&spec.columns.shop_id);
        let date = row
            .cell(&spec.columns.date)
            .and_then(|c| normalize_date(c, spec.day_offset));
        let amount = row.number(&spec.columns.amount);

        let (shop_id, date) = match (shop_id, date) {
            (s, Some(d)) if !s.is_empty() => (s, d),
            _ => {
                skipped += 1;
                continue;
            }
        };

        let entry = groups
            .entry((shop_id.clone(), date))
            .or_insert_with(|| ShopDayNet {
                shop_id,
                shop_name: row.text(&spec.columns.shop_name),
                contract_start_date: row.text(&spec.columns.contract_start),
                date,
                net_amount: 0.0,
            });
        entry.net_amount += amount;
    }

    (groups, skipped)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
