//! Invoice-wide line validation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{LineFields, LineValidationResult, ValidationSummary};

use super::{find_valid_formula, Tolerance};

/// All per-line results plus the aggregate verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceValidation {
    pub results: Vec<LineValidationResult>,
    pub summary: ValidationSummary,
}

/// Validate every line of an invoice independently.
///
/// Lines are numbered from 1. `all_valid` holds only when every non-skipped
/// line found a matching formula; skipped zero-price lines never count
/// against the invoice.
pub fn validate_all_lines(lines: &[LineFields], tolerance: &Tolerance) -> InvoiceValidation {
    let mut results = Vec::with_capacity(lines.len());
    let mut summary = ValidationSummary::default();

    for (index, line) in lines.iter().enumerate() {
        let mut result = find_valid_formula(line, tolerance);
        result.line_number = index + 1;

        if result.skipped {
            summary.skipped += 1;
        } else if result.found {
            summary.valid += 1;
        } else {
            summary.invalid += 1;
        }

        results.push(result);
    }

    summary.all_valid = summary.invalid == 0;

    debug!(
        "validated {} lines: {} valid, {} invalid, {} skipped",
        lines.len(),
        summary.valid,
        summary.invalid,
        summary.skipped
    );

    InvoiceValidation { results, summary }
}
