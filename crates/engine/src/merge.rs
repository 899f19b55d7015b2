use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::model::{CombinedDailyRecord, CombinedTotals, DailyRecord, SeriesSet};

/// Merge the per-source daily series into one combined table over the
/// sorted union of dates. A source missing a date contributes zero
/// amount and zero shop count.
pub fn combine(set: &SeriesSet) -> Vec<CombinedDailyRecord> {
    let fixed_fee = by_date(&set.fixed_fee);
    let cycle_a = by_date(&set.cycle_a);
    let cycle_b = by_date(&set.cycle_b);
    let offline = by_date(&set.offline);

    let mut dates: BTreeSet<NaiveDate> = BTreeSet::new();
    for map in [&fixed_fee, &cycle_a, &cycle_b, &offline] {
        dates.extend(map.keys().copied());
    }

    dates
        .into_iter()
        .map(|date| {
            let (ff_amount, ff_shops) = lookup(&fixed_fee, date);
            let (ca_amount, ca_shops) = lookup(&cycle_a, date);
            let (cb_amount, cb_shops) = lookup(&cycle_b, date);
            let (of_amount, of_shops) = lookup(&offline, date);

            CombinedDailyRecord {
                date,
                fixed_fee_amount: ff_amount,
                fixed_fee_shop_count: ff_shops,
                cycle_a_amount: ca_amount,
                cycle_a_shop_count: ca_shops,
                cycle_b_amount: cb_amount,
                cycle_b_shop_count: cb_shops,
                offline_amount: of_amount,
                offline_shop_count: of_shops,
                total_amount: ff_amount + ca_amount + cb_amount + of_amount,
                // Payout-reconciliation sources only. The fixed-fee
                // count is a recurring-fee population and stays out.
                total_shop_count: ca_shops + cb_shops + of_shops,
            }
        })
        .collect()
}

/// Column sums for the combined table's footer.
pub fn totals(combined: &[CombinedDailyRecord]) -> CombinedTotals {
    let mut t = CombinedTotals {
        day_count: combined.len(),
        ..CombinedTotals::default()
    };
    for day in combined {
        t.fixed_fee_amount += day.fixed_fee_amount;
        t.cycle_a_amount += day.cycle_a_amount;
        t.cycle_b_amount += day.cycle_b_amount;
        t.offline_amount += day.offline_amount;
        t.total_amount += day.total_amount;
        t.total_shop_count += day.total_shop_count;
    }
    t
}

fn by_date(series: &[DailyRecord]) -> BTreeMap<NaiveDate, &DailyRecord> {
    series.iter().map(|d| (d.date, d)).collect()
}

fn lookup(map: &BTreeMap<NaiveDate, &DailyRecord>, date: NaiveDate) -> (f64, usize) {
    map.get(&date)
        .map(|d| (d.total_amount, d.shop_count))
        .unwrap_or((0.0, 0))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
