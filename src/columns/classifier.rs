//! Numeric cell extraction and heuristic column-role flags.

use serde::{Deserialize, Serialize};

use crate::models::Cell;
use crate::rules::numeric::parse_cell;
use crate::rules::patterns::AMOUNT_SHAPE;

/// A parsed numeric cell with positional role hints.
///
/// Constructed fresh per row scan and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericCell {
    /// Index of the cell in the raw row (non-numeric cells included).
    pub column_index: usize,
    pub raw_text: String,
    pub value: f64,
    pub is_likely_price: bool,
    pub is_likely_total: bool,
}

/// Extract every parseable numeric cell from a raw row, left to right.
///
/// Currency-shaped cells among the two rightmost numeric positions are
/// flagged as total candidates; a currency-shaped neighbour immediately to
/// their left is flagged as a price candidate.
pub fn extract_numeric_cells(row: &[Cell]) -> Vec<NumericCell> {
    let mut cells = Vec::new();
    let mut amount_shaped = Vec::new();

    for (index, cell) in row.iter().enumerate() {
        let Some(value) = parse_cell(cell) else {
            continue;
        };
        amount_shaped.push(is_amount_shaped(cell, value));
        cells.push(NumericCell {
            column_index: index,
            raw_text: raw_text_of(cell),
            value,
            is_likely_price: false,
            is_likely_total: false,
        });
    }

    let count = cells.len();
    for position in 0..count {
        if amount_shaped[position] && position + 2 >= count {
            cells[position].is_likely_total = true;
            if position > 0 && amount_shaped[position - 1] {
                cells[position - 1].is_likely_price = true;
            }
        }
    }

    cells
}

/// Pick the total column: flagged cells first, rightmost index wins.
pub fn identify_total_column(cells: &[NumericCell]) -> Option<usize> {
    cells
        .iter()
        .filter(|cell| cell.is_likely_total)
        .map(|cell| cell.column_index)
        .max()
        .or_else(|| cells.iter().map(|cell| cell.column_index).max())
}

/// Pick the price column among the cells left after claiming the total.
pub fn identify_price_column(cells: &[NumericCell], total_index: usize) -> Option<usize> {
    let remaining: Vec<&NumericCell> = cells
        .iter()
        .filter(|cell| cell.column_index != total_index)
        .collect();

    remaining
        .iter()
        .filter(|cell| cell.is_likely_price)
        .map(|cell| cell.column_index)
        .max()
        .or_else(|| remaining.iter().map(|cell| cell.column_index).max())
}

/// Every numeric column that is neither price nor total, in column order.
/// Several candidates is the normal case: ordered-quantity and billed-weight
/// columns usually coexist.
pub fn identify_billing_candidates(
    cells: &[NumericCell],
    total_index: usize,
    price_index: usize,
) -> Vec<usize> {
    cells
        .iter()
        .map(|cell| cell.column_index)
        .filter(|&index| index != total_index && index != price_index)
        .collect()
}

fn is_amount_shaped(cell: &Cell, value: f64) -> bool {
    match cell {
        Cell::Text(text) => AMOUNT_SHAPE.is_match(text.trim()),
        // Pre-parsed numbers lose their formatting; a fractional part is the
        // best remaining signal of a currency amount.
        Cell::Number(_) => value.fract() != 0.0,
        Cell::Empty => false,
    }
}

fn raw_text_of(cell: &Cell) -> String {
    match cell {
        Cell::Text(text) => text.clone(),
        Cell::Number(value) => value.to_string(),
        Cell::Empty => String::new(),
    }
}
