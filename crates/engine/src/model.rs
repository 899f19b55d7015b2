use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::source::SourceId;

// ---------------------------------------------------------------------------
// Per-source output
// ---------------------------------------------------------------------------

/// One per distinct date per source. `shop_count` is the cardinality of
/// the set of distinct shop identifiers contributing to that date, never
/// a row count.
///
/// Field names are part of the on-disk JSON contract — existing result
/// files use exactly `date` / `totalAmount` / `shopCount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub total_amount: f64,
    pub shop_count: usize,
}

/// Fixed-fee source only: one per distinct shop across the whole batch,
/// summed over its qualifying days. Sorted by descending total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopRecord {
    pub shop_id: String,
    pub shop_name: String,
    pub contract_start_date: String,
    pub total_amount: f64,
}

/// Batch-level ingest statistics, reported back to the caller after an
/// upload is processed.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStats {
    /// Rows in the upload, including any that were skipped.
    pub rows_read: usize,
    /// Malformed or non-qualifying rows silently excluded.
    pub rows_skipped: usize,
    pub day_count: usize,
    /// Distinct shops in the rollup; only the fixed-fee source emits one.
    pub shop_count: usize,
    pub total_amount: f64,
}

/// Full result of processing one upload for one source.
#[derive(Debug, Clone, Serialize)]
pub struct SourceReport {
    pub source: SourceId,
    pub daily: Vec<DailyRecord>,
    /// Empty for every source except fixed-fee.
    pub shops: Vec<ShopRecord>,
    pub stats: IngestStats,
}

// ---------------------------------------------------------------------------
// Combined output
// ---------------------------------------------------------------------------

/// The four per-source series side by side, for merging. A source whose
/// series is empty simply contributes zeros.
#[derive(Debug, Clone, Default)]
pub struct SeriesSet {
    pub fixed_fee: Vec<DailyRecord>,
    pub cycle_a: Vec<DailyRecord>,
    pub cycle_b: Vec<DailyRecord>,
    pub offline: Vec<DailyRecord>,
}

impl SeriesSet {
    pub fn is_empty(&self) -> bool {
        self.fixed_fee.is_empty()
            && self.cycle_a.is_empty()
            && self.cycle_b.is_empty()
            && self.offline.is_empty()
    }
}

/// One row of the combined table, per date in the union of all source
/// date sets.
///
/// `total_shop_count` sums only the payout-reconciliation sources
/// (cycle A, cycle B, offline). The fixed-fee count is a recurring-fee
/// population, not a daily cash-reconciliation population; adding it
/// would double-count shops that appear in both a recurring-fee record
/// and a same-day payout record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedDailyRecord {
    pub date: NaiveDate,
    pub fixed_fee_amount: f64,
    pub fixed_fee_shop_count: usize,
    pub cycle_a_amount: f64,
    pub cycle_a_shop_count: usize,
    pub cycle_b_amount: f64,
    pub cycle_b_shop_count: usize,
    pub offline_amount: f64,
    pub offline_shop_count: usize,
    pub total_amount: f64,
    pub total_shop_count: usize,
}

/// Column sums over the whole combined table (the report footer row).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedTotals {
    pub day_count: usize,
    pub fixed_fee_amount: f64,
    pub cycle_a_amount: f64,
    pub cycle_b_amount: f64,
    pub offline_amount: f64,
    pub total_amount: f64,
    pub total_shop_count: usize,
}
