use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{fold_by_date, fold_by_shop_day, DailyFold};
use crate::error::EngineError;
use crate::model::{DailyRecord, IngestStats, ShopRecord, SourceReport};
use crate::row::RawRow;
use crate::validate::Acceptance;

// ---------------------------------------------------------------------------
// Source identity
// ---------------------------------------------------------------------------

/// One upstream billing export type. Each has its own column layout,
/// grouping rule, and date convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    /// Recurring fixed-fee billing; shop×date netting against standard
    /// amounts, plus a per-shop rollup.
    FixedFee,
    /// Platform A cycle payouts.
    CycleA,
    /// Platform B cycle payouts; labeled with the following day's date
    /// and prefixed by a repeated header row.
    CycleB,
    /// Platform B offline receipts; loosely specified export, same
    /// platform family as cycle B but exempt from its day shift.
    Offline,
}

impl SourceId {
    pub const ALL: [SourceId; 4] = [
        SourceId::FixedFee,
        SourceId::CycleA,
        SourceId::CycleB,
        SourceId::Offline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FixedFee => "fixed-fee",
            Self::CycleA => "cycle-a",
            Self::CycleB => "cycle-b",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceId {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fixed-fee" => Ok(Self::FixedFee),
            "cycle-a" => Ok(Self::CycleA),
            "cycle-b" => Ok(Self::CycleB),
            "offline" => Ok(Self::Offline),
            other => Err(EngineError::UnknownSource(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Source spec
// ---------------------------------------------------------------------------

/// Which composite key a source folds on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// (shop, date) — nets per shop-day, then validates each net.
    ShopDate,
    /// date only — shop set tracked per date for the distinct count.
    Date,
}

/// Ordered lists of accepted column labels per logical field. Evaluated
/// at row-read time; the engine never assumes a fixed row shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnMap {
    pub shop_id: Vec<String>,
    #[serde(default)]
    pub shop_name: Vec<String>,
    #[serde(default)]
    pub contract_start: Vec<String>,
    pub amount: Vec<String>,
    pub date: Vec<String>,
}

/// Everything that distinguishes one source processor from another.
/// The processors themselves are one shared pure function over this.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceSpec {
    pub columns: ColumnMap,
    pub granularity: Granularity,
    /// Whole-day shift applied after date resolution (0 or −1).
    #[serde(default)]
    pub day_offset: i64,
    /// Rows discarded unconditionally before processing (repeated
    /// header masquerading as data).
    #[serde(default)]
    pub skip_leading_rows: usize,
    pub acceptance: Acceptance,
}

// ---------------------------------------------------------------------------
// Processing
// ---------------------------------------------------------------------------

/// Turn one upload's raw rows into that source's report. Pure and
/// stateless: same rows in, same report out.
pub fn process(id: SourceId, spec: &SourceSpec, rows: &[RawRow]) -> SourceReport {
    match spec.granularity {
        Granularity::ShopDate => process_shop_date(id, spec, rows),
        Granularity::Date => process_by_date(id, spec, rows),
    }
}

fn process_by_date(id: SourceId, spec: &SourceSpec, rows: &[RawRow]) -> SourceReport {
    let (groups, skipped) = fold_by_date(spec, rows);
    let daily = daily_records(groups);
    let stats = IngestStats {
        rows_read: rows.len(),
        rows_skipped: skipped,
        day_count: daily.len(),
        shop_count: 0,
        total_amount: daily.iter().map(|d| d.total_amount).sum(),
    };
    SourceReport { source: id, daily, shops: Vec::new(), stats }
}

fn process_shop_date(id: SourceId, spec: &SourceSpec, rows: &[RawRow]) -> SourceReport {
    let (nets, skipped) = fold_by_shop_day(spec, rows);

    // Only shop-days whose net matches the acceptance rule contribute —
    // rejected nets are excluded from both the daily series and the shop
    // rollup, even though their rows were read.
    let mut shop_map: BTreeMap<String, ShopRecord> = BTreeMap::new();
    let mut daily_map: BTreeMap<NaiveDate, DailyFold> = BTreeMap::new();

    for net in nets.into_values() {
        if !spec.acceptance.accepts(net.net_amount) {
            continue;
        }

        let shop = shop_map.entry(net.shop_id.clone()).or_insert_with(|| ShopRecord {
            shop_id: net.shop_id.clone(),
            shop_name: net.shop_name.clone(),
            contract_start_date: net.contract_start_date.clone(),
            total_amount: 0.0,
        });
        shop.total_amount += net.net_amount;

        let day = daily_map.entry(net.date).or_default();
        day.amount += net.net_amount;
        day.shops.insert(net.shop_id);
    }

    let mut shops: Vec<ShopRecord> = shop_map.into_values().collect();
    shops.sort_by(|a, b| {
        b.total_amount
            .partial_cmp(&a.total_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.shop_id.cmp(&b.shop_id))
    });

    let daily = daily_records(daily_map);
    let stats = IngestStats {
        rows_read: rows.len(),
        rows_skipped: skipped,
        day_count: daily.len(),
        shop_count: shops.len(),
        total_amount: daily.iter().map(|d| d.total_amount).sum(),
    };
    SourceReport { source: id, daily, shops, stats }
}

/// BTreeMap ordering already gives ascending dates with no duplicates.
fn daily_records(groups: BTreeMap<NaiveDate, DailyFold>) -> Vec<DailyRecord> {
    groups
        .into_iter()
        .map(|(date, fold)| DailyRecord {
            date,
            total_amount: fold.amount,
            shop_count: fold.shops.len(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SourceCatalog;
    use crate::row::Cell;

    #[test]
    fn selector_round_trip() {
        for id in SourceId::ALL {
            assert_eq!(id.as_str().parse::<SourceId>().unwrap(), id);
        }
    }

    #[test]
    fn unknown_selector_is_an_error() {
        let err = "meituan".parse::<SourceId>().unwrap_err();
        assert!(err.to_string().contains("meituan"));
    }

    fn fixed_fee_row(shop: &str, name: &str, amount: f64, date: &str) -> RawRow {
        let mut r = RawRow::new();
        r.insert("门店ID", Cell::Text(shop.into()));
        r.insert("店铺名称", Cell::Text(name.into()));
        r.insert("合同开始时间", Cell::Text("2025-09-21".into()));
        r.insert("结算金额", Cell::Number(amount));
        r.insert("结算日期", Cell::Text(date.into()));
        r
    }

    #[test]
    fn fixed_fee_nets_then_validates() {
        let catalog = SourceCatalog::builtin();
        let rows = vec![
            fixed_fee_row("S1", "Shop One", 20.0, "2025-10-01"),
            fixed_fee_row("S1", "Shop One", 13.95, "2025-10-01"),
            fixed_fee_row("S2", "Shop Two", 30.0, "2025-10-01"),
        ];
        let report = process(SourceId::FixedFee, catalog.spec(SourceId::FixedFee), &rows);

        // S1 nets to 33.95 and qualifies; S2 nets to 30.00 and is excluded.
        assert_eq!(report.daily.len(), 1);
        let day = &report.daily[0];
        assert_eq!(day.date.to_string(), "2025-10-01");
        assert!((day.total_amount - 33.95).abs() < 1e-9);
        assert_eq!(day.shop_count, 1);

        assert_eq!(report.shops.len(), 1);
        assert_eq!(report.shops[0].shop_id, "S1");
        assert!((report.shops[0].total_amount - 33.95).abs() < 1e-9);

        assert_eq!(report.stats.rows_read, 3);
        assert_eq!(report.stats.shop_count, 1);
    }

    #[test]
    fn fixed_fee_shop_rollup_sorted_descending() {
        let catalog = SourceCatalog::builtin();
        let rows = vec![
            fixed_fee_row("S1", "One", 33.95, "2025-10-01"),
            fixed_fee_row("S2", "Two", 33.95, "2025-10-01"),
            fixed_fee_row("S2", "Two", 33.95, "2025-10-02"),
        ];
        let report = process(SourceId::FixedFee, catalog.spec(SourceId::FixedFee), &rows);
        assert_eq!(report.shops[0].shop_id, "S2");
        assert!((report.shops[0].total_amount - 67.9).abs() < 1e-9);
        assert_eq!(report.shops[1].shop_id, "S1");
    }

    #[test]
    fn cycle_b_shifts_dates_and_skips_repeated_header() {
        let catalog = SourceCatalog::builtin();

        let mut header = RawRow::new();
        header.insert("代运营账单", Cell::Text("日期".into()));
        header.insert("_1", Cell::Text("门店ID".into()));
        header.insert("_4", Cell::Text("结算金额(元)".into()));

        let mut data = RawRow::new();
        data.insert("代运营账单", Cell::Text("2025-10-02".into()));
        data.insert("_1", Cell::Number(2238.0));
        data.insert("_4", Cell::Number(150.5));

        let report = process(
            SourceId::CycleB,
            catalog.spec(SourceId::CycleB),
            &[header, data],
        );

        assert_eq!(report.daily.len(), 1);
        // Labeled 10-02, earned 10-01.
        assert_eq!(report.daily[0].date.to_string(), "2025-10-01");
        assert!((report.daily[0].total_amount - 150.5).abs() < 1e-9);
        assert_eq!(report.daily[0].shop_count, 1);
        assert_eq!(report.stats.rows_skipped, 1);
    }

    #[test]
    fn offline_accepts_serial_dates_and_fallback_labels() {
        let catalog = SourceCatalog::builtin();

        // Serial 45562 = 2024-09-27; offline is exempt from the day shift.
        let mut a = RawRow::new();
        a.insert("日期", Cell::Number(45562.0));
        a.insert("门店id", Cell::Text("s1".into()));
        a.insert("收款金额", Cell::Number(88.0));

        let mut b = RawRow::new();
        b.insert("交易日期", Cell::Text("2024-09-27".into()));
        b.insert("店铺ID", Cell::Text("s2".into()));
        b.insert("金额", Cell::Number(12.0));

        let report = process(SourceId::Offline, catalog.spec(SourceId::Offline), &[a, b]);
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.daily[0].date.to_string(), "2024-09-27");
        assert!((report.daily[0].total_amount - 100.0).abs() < 1e-9);
        assert_eq!(report.daily[0].shop_count, 2);
    }

    #[test]
    fn cycle_a_drops_zero_amount_rows() {
        let catalog = SourceCatalog::builtin();

        let mut paid = RawRow::new();
        paid.insert("门店id", Cell::Text("s1".into()));
        paid.insert("代运营结算金额", Cell::Number(42.0));
        paid.insert("账单日期", Cell::Text("2025-10-01".into()));

        let mut zero = RawRow::new();
        zero.insert("门店id", Cell::Text("s2".into()));
        zero.insert("代运营结算金额", Cell::Number(0.0));
        zero.insert("账单日期", Cell::Text("2025-10-01".into()));

        let report = process(SourceId::CycleA, catalog.spec(SourceId::CycleA), &[paid, zero]);
        assert_eq!(report.daily[0].shop_count, 1);
        assert!((report.daily[0].total_amount - 42.0).abs() < 1e-9);
        assert_eq!(report.stats.rows_skipped, 1);
    }

    #[test]
    fn output_series_sorted_ascending_no_duplicates() {
        let catalog = SourceCatalog::builtin();
        let mut rows = Vec::new();
        for (date, amt) in [("2025-10-03", 3.0), ("2025-10-01", 1.0), ("2025-10-02", 2.0), ("2025-10-01", 1.5)] {
            let mut r = RawRow::new();
            r.insert("门店id", Cell::Text("s1".into()));
            r.insert("代运营结算金额", Cell::Number(amt));
            r.insert("账单日期", Cell::Text(date.into()));
            rows.push(r);
        }
        let report = process(SourceId::CycleA, catalog.spec(SourceId::CycleA), &rows);
        let dates: Vec<String> = report.daily.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, ["2025-10-01", "2025-10-02", "2025-10-03"]);
        assert!((report.daily[0].total_amount - 2.5).abs() < 1e-9);
    }
}
