//! Validation result value types.
//!
//! Everything here is a plain serializable value with no behavior attached,
//! suitable for direct rendering in a review UI or for gating a save action.

use serde::{Deserialize, Serialize};

use super::line::LineFields;

/// Arithmetic hypothesis relating a line's quantity fields to its total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaType {
    /// ordered quantity × unit price
    Simple,
    /// billed quantity × unit price
    BillingQty,
    /// cases × pack count × pack size × unit price
    PackWeight,
    /// weight × unit price
    SimpleWeight,
    /// billing reverse-engineered as total ÷ price (last resort)
    Derived,
}

impl FormulaType {
    /// Hypotheses in evaluation order. The first within-tolerance match wins,
    /// which keeps results reproducible when several hypotheses would match
    /// by coincidence. `Derived` is not listed: it is tautologically
    /// satisfiable and only ever reported as a fallback.
    pub const PRIORITY: [FormulaType; 4] = [
        FormulaType::Simple,
        FormulaType::BillingQty,
        FormulaType::PackWeight,
        FormulaType::SimpleWeight,
    ];
}

/// One tested hypothesis for one line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormulaCandidate {
    pub formula: FormulaType,
    /// The billing quantity this hypothesis assumed.
    pub billing_value: f64,
    pub price_value: f64,
    /// The total reported on the invoice.
    pub total_value: f64,
    pub computed_total: f64,
    /// Signed as computed − reported.
    pub difference: f64,
    pub within_tolerance: bool,
}

/// Verdict for a single invoice line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineValidationResult {
    /// 1-based position of the line on the invoice; 0 until numbered by the
    /// invoice-level validator.
    pub line_number: usize,

    /// Whether some hypothesis matched within tolerance.
    pub found: bool,

    /// Zero-price promotional lines are skipped, not judged.
    pub skipped: bool,

    /// On failure this still carries the closest candidate so reviewers see
    /// what the numbers would have to be.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_match: Option<FormulaCandidate>,

    /// Every hypothesis that was tested, in evaluation order.
    pub candidates: Vec<FormulaCandidate>,

    /// The input line, kept for diagnostic display.
    pub line: LineFields,
}

/// Aggregate pass/fail counts over an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub valid: usize,
    pub invalid: usize,
    /// Zero-price lines excluded from the verdict; a free sample with a zero
    /// total is not a math error.
    pub skipped: usize,
    pub all_valid: bool,
}

/// How a column mapping was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingSource {
    /// A formula matched within tolerance on the evidence rows.
    Exact,
    /// Reverse-engineered as billing = total ÷ price. Always "succeeds", so
    /// it is ranked lowest and used only as a last resort.
    Derived,
    /// Majority agreement across three or more lines.
    Consensus,
}

/// Which raw columns hold the billing quantity, unit price and line total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// Column holding the billing quantity. When the quantity comes from a
    /// pack notation in the description text, this points at the ordered
    /// quantity column (or the description column if no such column exists).
    pub billing_index: usize,

    pub price_index: usize,

    pub total_index: usize,

    /// Set when billing is the product of two columns (pack count × pack size).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_count_index: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_weight_index: Option<usize>,

    pub source: MappingSource,

    /// Share of evidence rows agreeing with this mapping, in [0, 1].
    pub confidence: f64,
}
