//! Formula hypothesis search for a single invoice line.

use tracing::trace;

use crate::models::{FormulaCandidate, FormulaType, LineFields, LineValidationResult};
use crate::rules::extract_pack_format;

use super::Tolerance;

/// Try every formula hypothesis against one line, in priority order.
///
/// The first hypothesis within tolerance wins. When none matches, the
/// derived candidate (billing = total ÷ price) is still reported as
/// `best_match` with `found = false`, so review UIs always get a usable
/// number. A line with zero price and zero total is skipped, not judged:
/// promotional lines are not math errors.
pub fn find_valid_formula(line: &LineFields, tolerance: &Tolerance) -> LineValidationResult {
    let (price, total) = match (line.unit_price, line.total_price) {
        (Some(price), Some(total)) if price != 0.0 || total != 0.0 => (price, total),
        _ => return skipped_result(line),
    };

    let mut candidates = Vec::new();

    for formula in FormulaType::PRIORITY {
        let Some(billing) = billing_quantity_for(formula, line) else {
            continue;
        };
        let candidate = build_candidate(formula, billing, price, total, tolerance);
        trace!(
            "hypothesis {:?}: computed {:.4} vs reported {:.4}",
            formula, candidate.computed_total, total
        );
        candidates.push(candidate.clone());

        if candidate.within_tolerance {
            return LineValidationResult {
                line_number: 0,
                found: true,
                skipped: false,
                best_match: Some(candidate),
                candidates,
                line: line.clone(),
            };
        }
    }

    // Nothing matched. Report the reverse-engineered billing quantity so the
    // reviewer sees what it would have to be.
    let best_match = if price != 0.0 {
        let derived = build_candidate(FormulaType::Derived, total / price, price, total, tolerance);
        candidates.push(derived.clone());
        Some(derived)
    } else {
        // Zero price with a non-zero total: division is meaningless, fall
        // back to the closest real candidate.
        candidates
            .iter()
            .min_by(|a, b| a.difference.abs().total_cmp(&b.difference.abs()))
            .cloned()
    };

    LineValidationResult {
        line_number: 0,
        found: false,
        skipped: false,
        best_match,
        candidates,
        line: line.clone(),
    }
}

fn skipped_result(line: &LineFields) -> LineValidationResult {
    LineValidationResult {
        line_number: 0,
        found: false,
        skipped: true,
        best_match: None,
        candidates: Vec::new(),
        line: line.clone(),
    }
}

/// The billing quantity a hypothesis assumes, or `None` when its required
/// fields are absent.
fn billing_quantity_for(formula: FormulaType, line: &LineFields) -> Option<f64> {
    match formula {
        FormulaType::Simple => line.quantity,
        FormulaType::BillingQty => line.billing_quantity,
        FormulaType::PackWeight => {
            // Explicit pack fields win; otherwise the description text may
            // carry the notation. Without an ordered quantity the case count
            // defaults to one.
            let cases = line.quantity.unwrap_or(1.0);
            let (packs, each) = match (line.pack_count, line.pack_weight) {
                (Some(packs), Some(each)) => (packs, each),
                _ => {
                    let pack = extract_pack_format(line.description.as_deref()?)?;
                    (pack.pack_count, pack.unit_value)
                }
            };
            Some(cases * packs * each)
        }
        FormulaType::SimpleWeight => line.weight,
        // Derived is not a searchable hypothesis; it is built explicitly as
        // the fallback.
        FormulaType::Derived => None,
    }
}

fn build_candidate(
    formula: FormulaType,
    billing: f64,
    price: f64,
    total: f64,
    tolerance: &Tolerance,
) -> FormulaCandidate {
    let computed = billing * price;
    FormulaCandidate {
        formula,
        billing_value: billing,
        price_value: price,
        total_value: total,
        computed_total: computed,
        difference: computed - total,
        within_tolerance: tolerance.accepts(computed, total),
    }
}
