//! Column-role inference from unlabeled rows.
//!
//! Given raw invoice rows whose column labels were lost (or never read), the
//! solver proposes which column indices hold the billing quantity, unit price
//! and line total by testing `billing × price ≈ total` positionally across
//! the evidence rows.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::SolveReason;
use crate::formula::{validate_all_lines, Tolerance};
use crate::models::{
    Cell, ColumnMapping, LineFields, LineValidationResult, MappingSource, ValidationSummary,
};
use crate::rules::extract_pack_format;

use super::classifier::{
    extract_numeric_cells, identify_billing_candidates, identify_price_column,
    identify_total_column, NumericCell,
};

/// Confidence assigned to the derived last-resort mapping. Reverse
/// engineering billing as total ÷ price cannot fail, so it never competes
/// with evidence-backed mappings.
const DERIVED_CONFIDENCE: f64 = 0.25;

/// Outcome of column solving over an evidence row set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSolve {
    /// True when an evidence-backed mapping was found.
    pub found: bool,

    /// Best-effort mapping; `None` only when solving could not run at all.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<ColumnMapping>,

    /// Per-row validation under the returned mapping.
    pub validation: ValidationSummary,

    pub row_results: Vec<LineValidationResult>,

    /// Set when solving could not run (too few rows or numeric columns).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<SolveReason>,
}

/// Propose billing/price/total column indices for a set of raw rows.
///
/// Requires at least two rows with at least two numeric columns each. The
/// total and price columns are anchored on the first usable row; every other
/// numeric column is tested as the billing quantity across all rows, with
/// compound (pack count × pack size) and description-text retries when no
/// single column reaches a majority. A derived mapping is returned as the
/// last resort so callers always get a non-null mapping once the structural
/// requirements are met.
pub fn solve_columns(
    rows: &[Vec<Cell>],
    description_column: Option<usize>,
    tolerance: &Tolerance,
) -> ColumnSolve {
    if rows.len() < 2 {
        return unsolved(SolveReason::NotEnoughRows(rows.len()));
    }

    let parsed: Vec<Vec<NumericCell>> = rows.iter().map(|row| extract_numeric_cells(row)).collect();
    let usable: Vec<usize> = parsed
        .iter()
        .enumerate()
        .filter(|(_, cells)| cells.len() >= 2)
        .map(|(index, _)| index)
        .collect();

    if usable.len() < 2 {
        return unsolved(SolveReason::NotEnoughNumericColumns);
    }

    // Column roles are anchored on the first usable row; the remaining rows
    // only vote on the arithmetic.
    let representative = &parsed[usable[0]];
    let Some(total_index) = identify_total_column(representative) else {
        return unsolved(SolveReason::NoPriceTotalPair);
    };
    let Some(price_index) = identify_price_column(representative, total_index) else {
        return unsolved(SolveReason::NoPriceTotalPair);
    };
    let candidates = identify_billing_candidates(representative, total_index, price_index);

    debug!(
        "anchored roles on row {}: total col {}, price col {}, billing candidates {:?}",
        usable[0], total_index, price_index, candidates
    );

    let evidence: Vec<&[NumericCell]> = usable.iter().map(|&index| parsed[index].as_slice()).collect();
    let majority = evidence.len() / 2 + 1;

    // Pass 1: a single column explains the totals.
    let mut best: Option<(usize, usize)> = None;
    for &candidate in &candidates {
        let matches = evidence
            .iter()
            .filter(|cells| product_matches(cells, &[candidate, price_index], total_index, tolerance))
            .count();
        trace!("billing candidate col {}: {}/{} rows match", candidate, matches, evidence.len());
        if best.is_none_or(|(_, top)| matches > top) {
            best = Some((candidate, matches));
        }
    }

    if let Some((column, matches)) = best {
        if matches >= majority {
            let mapping = ColumnMapping {
                billing_index: column,
                price_index,
                total_index,
                pack_count_index: None,
                pack_weight_index: None,
                source: MappingSource::Exact,
                confidence: matches as f64 / evidence.len() as f64,
            };
            return solved(rows, &parsed, &usable, mapping, description_column, tolerance);
        }
    }

    // Pass 2: billing is the product of two columns (pack count × pack size).
    for (offset, &count_col) in candidates.iter().enumerate() {
        for &size_col in &candidates[offset + 1..] {
            let matches = evidence
                .iter()
                .filter(|cells| {
                    product_matches(cells, &[count_col, size_col, price_index], total_index, tolerance)
                })
                .count();
            if matches >= majority {
                debug!(
                    "compound billing: cols {} x {} match {}/{} rows",
                    count_col, size_col, matches, evidence.len()
                );
                let mapping = ColumnMapping {
                    billing_index: count_col,
                    price_index,
                    total_index,
                    pack_count_index: Some(count_col),
                    pack_weight_index: Some(size_col),
                    source: MappingSource::Exact,
                    confidence: matches as f64 / evidence.len() as f64,
                };
                return solved(rows, &parsed, &usable, mapping, description_column, tolerance);
            }
        }
    }

    // Pass 3: a pack notation in the description column explains the totals,
    // with an ordered-quantity column as the case count when one matches.
    if let Some(description_index) = description_column {
        let case_candidates: Vec<Option<usize>> = candidates
            .iter()
            .map(|&column| Some(column))
            .chain(std::iter::once(None))
            .collect();

        for cases_column in case_candidates {
            let matches = usable
                .iter()
                .filter(|&&row_index| {
                    pack_text_matches(
                        &rows[row_index],
                        &parsed[row_index],
                        description_index,
                        cases_column,
                        price_index,
                        total_index,
                        tolerance,
                    )
                })
                .count();
            if matches >= majority {
                let billing_index = cases_column.unwrap_or(description_index);
                debug!(
                    "pack notation in col {} explains {}/{} rows (cases col {:?})",
                    description_index, matches, usable.len(), cases_column
                );
                let mapping = ColumnMapping {
                    billing_index,
                    price_index,
                    total_index,
                    pack_count_index: None,
                    pack_weight_index: None,
                    source: MappingSource::Exact,
                    confidence: matches as f64 / usable.len() as f64,
                };
                return solved(rows, &parsed, &usable, mapping, description_column, tolerance);
            }
        }
    }

    // Last resort: report the strongest candidate anyway and let the matcher
    // derive billing = total ÷ price per row.
    let billing_index = best
        .map(|(column, _)| column)
        .or_else(|| candidates.first().copied())
        .unwrap_or(price_index);
    let mapping = ColumnMapping {
        billing_index,
        price_index,
        total_index,
        pack_count_index: None,
        pack_weight_index: None,
        source: MappingSource::Derived,
        confidence: DERIVED_CONFIDENCE,
    };
    debug!("no evidence-backed mapping; falling back to derived billing");

    let mut solve = solved(rows, &parsed, &usable, mapping, description_column, tolerance);
    solve.found = false;
    solve
}

/// Best single-row mapping, used by the consensus resolver. Tries each
/// billing candidate in column order and returns the first whose product
/// explains the row's total.
pub(crate) fn solve_single_row(
    row: &[Cell],
    description_column: Option<usize>,
    tolerance: &Tolerance,
) -> Option<(usize, usize, usize)> {
    let cells = extract_numeric_cells(row);
    if cells.len() < 2 {
        return None;
    }

    let total_index = identify_total_column(&cells)?;
    let price_index = identify_price_column(&cells, total_index)?;

    for candidate in identify_billing_candidates(&cells, total_index, price_index) {
        if product_matches(&cells, &[candidate, price_index], total_index, tolerance) {
            return Some((candidate, price_index, total_index));
        }
    }

    // Pack notation fallback: the ordered-quantity column times the pack
    // total from the description.
    if let Some(description_index) = description_column {
        for candidate in identify_billing_candidates(&cells, total_index, price_index) {
            if pack_text_matches(
                row,
                &cells,
                description_index,
                Some(candidate),
                price_index,
                total_index,
                tolerance,
            ) {
                return Some((candidate, price_index, total_index));
            }
        }
    }

    None
}

fn unsolved(reason: SolveReason) -> ColumnSolve {
    ColumnSolve {
        found: false,
        mapping: None,
        validation: ValidationSummary::default(),
        row_results: Vec::new(),
        reason: Some(reason),
    }
}

/// Package a mapping together with the per-row validation it implies.
fn solved(
    rows: &[Vec<Cell>],
    parsed: &[Vec<NumericCell>],
    usable: &[usize],
    mapping: ColumnMapping,
    description_column: Option<usize>,
    tolerance: &Tolerance,
) -> ColumnSolve {
    let lines: Vec<LineFields> = usable
        .iter()
        .map(|&index| mapped_fields(&rows[index], &parsed[index], &mapping, description_column))
        .collect();
    let validation = validate_all_lines(&lines, tolerance);

    ColumnSolve {
        found: true,
        mapping: Some(mapping),
        validation: validation.summary,
        row_results: validation.results,
        reason: None,
    }
}

/// Project one raw row through a mapping into named line fields.
fn mapped_fields(
    row: &[Cell],
    cells: &[NumericCell],
    mapping: &ColumnMapping,
    description_column: Option<usize>,
) -> LineFields {
    let mut line = LineFields::default();

    match (mapping.pack_count_index, mapping.pack_weight_index) {
        (Some(count_col), Some(size_col)) => {
            line.pack_count = value_at(cells, count_col);
            line.pack_weight = value_at(cells, size_col);
        }
        _ => line.quantity = value_at(cells, mapping.billing_index),
    }

    line.unit_price = value_at(cells, mapping.price_index);
    line.total_price = value_at(cells, mapping.total_index);

    if let Some(description_index) = description_column {
        line.description = text_at(row, description_index).map(str::to_string);
    }

    line
}

/// Whether the product of the given columns matches the total on this row.
fn product_matches(
    cells: &[NumericCell],
    factor_columns: &[usize],
    total_column: usize,
    tolerance: &Tolerance,
) -> bool {
    let mut product = 1.0;
    for &column in factor_columns {
        let Some(value) = value_at(cells, column) else {
            return false;
        };
        product *= value;
    }
    match value_at(cells, total_column) {
        Some(total) => tolerance.accepts(product, total),
        None => false,
    }
}

fn pack_text_matches(
    row: &[Cell],
    cells: &[NumericCell],
    description_index: usize,
    cases_column: Option<usize>,
    price_index: usize,
    total_index: usize,
    tolerance: &Tolerance,
) -> bool {
    let Some(text) = text_at(row, description_index) else {
        return false;
    };
    let Some(pack) = extract_pack_format(text) else {
        return false;
    };

    let cases = match cases_column {
        Some(column) => match value_at(cells, column) {
            Some(value) => value,
            None => return false,
        },
        None => 1.0,
    };

    match (value_at(cells, price_index), value_at(cells, total_index)) {
        (Some(price), Some(total)) => tolerance.accepts(cases * pack.total_value * price, total),
        _ => false,
    }
}

fn value_at(cells: &[NumericCell], column: usize) -> Option<f64> {
    cells
        .iter()
        .find(|cell| cell.column_index == column)
        .map(|cell| cell.value)
}

fn text_at(row: &[Cell], column: usize) -> Option<&str> {
    match row.get(column)? {
        Cell::Text(text) => Some(text.as_str()),
        _ => None,
    }
}
