use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::EngineError;
use crate::source::{ColumnMap, Granularity, SourceId, SourceSpec};
use crate::validate::Acceptance;

/// The per-source specs the engine runs with.
///
/// The built-in catalog carries the real exports' column labels. A TOML
/// override can replace any source's spec without recompiling — export
/// formats are not contractually fixed.
#[derive(Debug, Clone)]
pub struct SourceCatalog {
    specs: BTreeMap<SourceId, SourceSpec>,
}

fn labels(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl SourceCatalog {
    pub fn builtin() -> Self {
        let mut specs = BTreeMap::new();

        specs.insert(
            SourceId::FixedFee,
            SourceSpec {
                columns: ColumnMap {
                    shop_id: labels(&["门店ID"]),
                    shop_name: labels(&["店铺名称"]),
                    contract_start: labels(&["合同开始时间"]),
                    amount: labels(&["结算金额"]),
                    date: labels(&["结算日期"]),
                },
                granularity: Granularity::ShopDate,
                day_offset: 0,
                skip_leading_rows: 0,
                // 33.95 = 35 − 1.05, 36.86 = 38 − 1.14 after platform commission.
                acceptance: Acceptance::Standard { amounts: vec![33.95, 36.86] },
            },
        );

        specs.insert(
            SourceId::CycleA,
            SourceSpec {
                columns: ColumnMap {
                    shop_id: labels(&["门店id"]),
                    shop_name: Vec::new(),
                    contract_start: Vec::new(),
                    amount: labels(&["代运营结算金额"]),
                    date: labels(&["账单日期"]),
                },
                granularity: Granularity::Date,
                day_offset: 0,
                skip_leading_rows: 0,
                acceptance: Acceptance::AnyNonzero,
            },
        );

        specs.insert(
            SourceId::CycleB,
            SourceSpec {
                columns: ColumnMap {
                    // Merged header cells leave these columns unlabeled;
                    // the importer names them positionally.
                    shop_id: labels(&["_1"]),
                    shop_name: Vec::new(),
                    contract_start: Vec::new(),
                    amount: labels(&["_4"]),
                    date: labels(&["代运营账单"]),
                },
                granularity: Granularity::Date,
                // This export labels a day's settlement with the
                // following day's date.
                day_offset: -1,
                skip_leading_rows: 1,
                acceptance: Acceptance::AnyNonzero,
            },
        );

        specs.insert(
            SourceId::Offline,
            SourceSpec {
                columns: ColumnMap {
                    shop_id: labels(&["门店id", "门店ID", "店铺ID"]),
                    shop_name: Vec::new(),
                    contract_start: Vec::new(),
                    amount: labels(&["收款金额", "线下收款金额", "金额"]),
                    date: labels(&["日期", "账单日期", "交易日期"]),
                },
                granularity: Granularity::Date,
                day_offset: 0,
                skip_leading_rows: 0,
                acceptance: Acceptance::AnyNonzero,
            },
        );

        Self { specs }
    }

    /// Parse a catalog override. Sources present in the TOML replace the
    /// built-in spec; absent sources keep their defaults.
    pub fn from_toml(input: &str) -> Result<Self, EngineError> {
        #[derive(Deserialize)]
        struct CatalogFile {
            sources: BTreeMap<SourceId, SourceSpec>,
        }

        let file: CatalogFile =
            toml::from_str(input).map_err(|e| EngineError::CatalogParse(e.to_string()))?;

        let mut catalog = Self::builtin();
        for (id, spec) in file.sources {
            catalog.specs.insert(id, spec);
        }
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn spec(&self, id: SourceId) -> &SourceSpec {
        // builtin() seeds every variant; overrides can only replace.
        &self.specs[&id]
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for (id, spec) in &self.specs {
            let invalid = |message: String| EngineError::CatalogValidation {
                source: id.to_string(),
                message,
            };

            if spec.columns.shop_id.is_empty() {
                return Err(invalid("no shop id column labels".into()));
            }
            if spec.columns.amount.is_empty() {
                return Err(invalid("no amount column labels".into()));
            }
            if spec.columns.date.is_empty() {
                return Err(invalid("no date column labels".into()));
            }
            if !(-1..=0).contains(&spec.day_offset) {
                return Err(invalid(format!(
                    "day_offset must be 0 or -1, got {}",
                    spec.day_offset
                )));
            }
            if let Acceptance::Standard { amounts } = &spec.acceptance {
                if amounts.is_empty() {
                    return Err(invalid("standard acceptance needs at least one amount".into()));
                }
            }
        }
        Ok(())
    }
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
