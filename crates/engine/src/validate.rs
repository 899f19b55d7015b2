use serde::Deserialize;

/// Two netted amounts within a cent of each other count as the same
/// settlement value.
pub const AMOUNT_TOLERANCE: f64 = 0.01;

/// Per-source acceptance rule for a netted per-key amount.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Acceptance {
    /// Net must match one of the standard fee values within
    /// [`AMOUNT_TOLERANCE`]. The set started as a single value and was
    /// later widened, so it is data, not a constant.
    Standard { amounts: Vec<f64> },
    /// Any nonzero net qualifies.
    AnyNonzero,
}

impl Acceptance {
    pub fn accepts(&self, net: f64) -> bool {
        match self {
            Self::Standard { amounts } => {
                amounts.iter().any(|s| (net - s).abs() < AMOUNT_TOLERANCE)
            }
            Self::AnyNonzero => net != 0.0,
        }
    }

    /// Whether individual zero-amount rows are dropped before folding.
    /// Standard-amount sources keep them: a day can net to the standard
    /// value through several partial rows.
    pub fn requires_nonzero_rows(&self) -> bool {
        matches!(self, Self::AnyNonzero)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_tolerance_boundaries() {
        let rule = Acceptance::Standard { amounts: vec![33.95] };
        assert!(rule.accepts(33.95));
        assert!(rule.accepts(33.94999));
        assert!(!rule.accepts(33.93));
        assert!(!rule.accepts(34.10));
    }

    #[test]
    fn standard_matches_any_value_in_set() {
        let rule = Acceptance::Standard { amounts: vec![33.95, 36.86] };
        assert!(rule.accepts(36.86));
        assert!(rule.accepts(33.95));
        assert!(!rule.accepts(35.0));
    }

    #[test]
    fn any_nonzero() {
        let rule = Acceptance::AnyNonzero;
        assert!(rule.accepts(0.01));
        assert!(rule.accepts(-5.0));
        assert!(!rule.accepts(0.0));
    }

    #[test]
    fn row_gating_only_for_nonzero_rule() {
        assert!(Acceptance::AnyNonzero.requires_nonzero_rows());
        assert!(!Acceptance::Standard { amounts: vec![33.95] }.requires_nonzero_rows());
    }
}
