//! Invoice-level subtotal and tax-cascade validation.
//!
//! Quebec invoices carry two taxes: TPS/GST at 5% and TVQ/QST at 9.975%
//! applied to the TPS-inclusive base. Extraction that computes the TVQ on
//! the subtotal alone is a recurring failure mode this validator must catch.

use serde::{Deserialize, Serialize};

/// TPS/GST rate.
pub const TPS_RATE: f64 = 0.05;

/// TVQ/QST rate, applied to the TPS-compounded base.
pub const TVQ_RATE: f64 = 0.09975;

/// Absolute tolerance for invoice-level checks.
pub const CASCADE_TOLERANCE: f64 = 0.02;

/// Invoice-level amounts as reported by the extraction layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CascadeInput {
    pub line_totals: Vec<f64>,
    pub subtotal: f64,
    /// Taxable extras (freight, fuel surcharge) added to the base before
    /// taxes. Zero when the invoice has none.
    pub surcharges: f64,
    pub tps: f64,
    pub tvq: f64,
    pub grand_total: f64,
}

/// One independent check in the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CascadeCheck {
    pub is_valid: bool,
    /// Signed as reported − computed, so a positive sum difference points at
    /// a missing line.
    pub difference: f64,
}

/// Verdicts for all four cascade stages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CascadeResult {
    /// Σ(line totals) against the reported subtotal.
    pub sum: CascadeCheck,
    /// Taxable base × 5% against the reported TPS.
    pub tps: CascadeCheck,
    /// (Taxable base + TPS) × 9.975% against the reported TVQ.
    pub tvq: CascadeCheck,
    /// Base + both taxes against the reported grand total.
    pub total: CascadeCheck,
    pub all_valid: bool,
}

/// Validate the subtotal, both taxes and the grand total.
///
/// The four checks are independent and all of them always run; no failure
/// short-circuits the others.
pub fn validate_cascade(invoice: &CascadeInput) -> CascadeResult {
    let line_sum: f64 = invoice.line_totals.iter().sum();
    let taxable = invoice.subtotal + invoice.surcharges;

    let sum = check(invoice.subtotal, line_sum);
    let tps = check(invoice.tps, taxable * TPS_RATE);
    // The TVQ compounds on the reported TPS, not on a recomputed one, so a
    // wrong TPS does not automatically fail the TVQ stage too.
    let tvq = check(invoice.tvq, (taxable + invoice.tps) * TVQ_RATE);
    let total = check(
        invoice.grand_total,
        taxable + invoice.tps + invoice.tvq,
    );

    CascadeResult {
        all_valid: sum.is_valid && tps.is_valid && tvq.is_valid && total.is_valid,
        sum,
        tps,
        tvq,
        total,
    }
}

fn check(reported: f64, computed: f64) -> CascadeCheck {
    let difference = reported - computed;
    CascadeCheck {
        is_valid: difference.abs() <= CASCADE_TOLERANCE,
        difference,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn consistent_invoice() -> CascadeInput {
        CascadeInput {
            line_totals: vec![150.0, 200.0, 100.0],
            subtotal: 450.0,
            surcharges: 0.0,
            tps: 22.5,
            tvq: 47.14,
            grand_total: 519.64,
        }
    }

    #[test]
    fn test_consistent_cascade() {
        let result = validate_cascade(&consistent_invoice());
        assert!(result.all_valid);
        assert!(result.sum.is_valid);
        assert!(result.tps.is_valid);
        assert!(result.tvq.is_valid);
        assert!(result.total.is_valid);
    }

    #[test]
    fn test_missing_line_shows_in_sum_difference() {
        let mut invoice = consistent_invoice();
        invoice.line_totals = vec![150.0, 100.0];

        let result = validate_cascade(&invoice);
        assert!(!result.sum.is_valid);
        assert!((result.sum.difference - 200.0).abs() < 1e-9);
        // the other stages keep running and still hold
        assert!(result.tps.is_valid);
        assert!(result.tvq.is_valid);
        assert!(result.total.is_valid);
        assert!(!result.all_valid);
    }

    #[test]
    fn test_non_compounded_tvq_is_rejected() {
        // TVQ computed on the subtotal alone (100 × 9.975% = 9.98) instead
        // of on the TPS-inclusive base (105 × 9.975% = 10.47)
        let invoice = CascadeInput {
            line_totals: vec![100.0],
            subtotal: 100.0,
            surcharges: 0.0,
            tps: 5.0,
            tvq: 9.98,
            grand_total: 114.98,
        };

        let result = validate_cascade(&invoice);
        assert!(result.sum.is_valid);
        assert!(result.tps.is_valid);
        assert!(!result.tvq.is_valid);
        assert!(!result.all_valid);
    }

    #[test]
    fn test_surcharges_extend_the_taxable_base() {
        // freight 35.00 + fuel 12.50 taxed alongside the goods
        let invoice = CascadeInput {
            line_totals: vec![450.0],
            subtotal: 450.0,
            surcharges: 47.5,
            tps: 24.88,
            tvq: 52.11,
            grand_total: 574.49,
        };

        let result = validate_cascade(&invoice);
        assert!(result.tps.is_valid);
        assert!(result.tvq.is_valid);
        assert!(result.total.is_valid);
        assert!(result.all_valid);
    }

    #[test]
    fn test_wrong_grand_total() {
        let mut invoice = consistent_invoice();
        invoice.grand_total = 520.0;

        let result = validate_cascade(&invoice);
        assert!(!result.total.is_valid);
        assert!(result.sum.is_valid && result.tps.is_valid && result.tvq.is_valid);
    }

    #[test]
    fn test_empty_invoice_with_zero_amounts() {
        let result = validate_cascade(&CascadeInput::default());
        assert!(result.all_valid);
    }
}
