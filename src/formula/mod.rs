//! Per-line formula matching and invoice-wide aggregation.

mod matcher;
mod validator;

pub use matcher::find_valid_formula;
pub use validator::{validate_all_lines, InvoiceValidation};

use serde::{Deserialize, Serialize};

/// Allowed discrepancy between a computed and a reported amount.
///
/// Cent-level absolute slack plus a small relative component for larger
/// invoices, where per-unit rounding accumulates. Both knobs are exposed
/// because extraction quality varies by vendor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub absolute: f64,
    pub relative: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            absolute: 0.02,
            relative: 0.002,
        }
    }
}

impl Tolerance {
    /// Whether `computed` is close enough to the reported amount.
    pub fn accepts(&self, computed: f64, actual: f64) -> bool {
        (computed - actual).abs() <= self.allowance(actual)
    }

    /// The maximum allowed difference for a reported amount.
    pub fn allowance(&self, actual: f64) -> f64 {
        self.absolute.max(self.relative * actual.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_slack() {
        let tolerance = Tolerance::default();
        assert!(tolerance.accepts(105.825, 105.83));
        assert!(tolerance.accepts(24.98, 25.00));
        assert!(!tolerance.accepts(24.50, 25.00));
    }

    #[test]
    fn test_relative_slack_for_large_amounts() {
        let tolerance = Tolerance::default();
        // 0.2% of 10,000 is 20: unit-rounding drift on big lines passes
        assert!(tolerance.accepts(10015.0, 10000.0));
        assert!(!tolerance.accepts(10025.0, 10000.0));
    }
}
