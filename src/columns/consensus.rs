//! Cross-line consensus over per-line column mappings.
//!
//! A single line can validate by coincidence (a quantity of 1 makes every
//! column "work"). Running the solver per line and keeping the mapping the
//! majority of lines agree on filters that noise out.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::formula::Tolerance;
use crate::models::{Cell, ColumnMapping, MappingSource};

use super::solver::{solve_columns, solve_single_row};

/// Knobs for consensus resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsensusOptions {
    /// Minimum share of lines that must agree for `found = true`.
    pub min_consensus: f64,
}

impl Default for ConsensusOptions {
    fn default() -> Self {
        Self { min_consensus: 0.9 }
    }
}

/// Result of consensus-based column solving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusSolve {
    pub found: bool,

    /// Best-vote mapping, returned even below the consensus threshold so the
    /// caller always has a best-effort answer to threshold on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapping: Option<ColumnMapping>,

    /// Share of lines agreeing with the returned mapping.
    pub confidence: f64,
}

/// Solve column roles line by line and keep the majority mapping.
///
/// Fewer than three lines is not enough for a vote; those delegate entirely
/// to [`solve_columns`]. When no line solves on its own, the full solver
/// (with its compound and derived fallbacks) runs as a last resort.
pub fn solve_columns_with_consensus(
    rows: &[Vec<Cell>],
    description_column: Option<usize>,
    options: &ConsensusOptions,
    tolerance: &Tolerance,
) -> ConsensusSolve {
    if rows.len() < 3 {
        return delegate(rows, description_column, tolerance);
    }

    let mut votes: HashMap<(usize, usize, usize), usize> = HashMap::new();
    for row in rows {
        if let Some(mapping) = solve_single_row(row, description_column, tolerance) {
            *votes.entry(mapping).or_insert(0) += 1;
        }
    }

    let winner = votes
        .iter()
        .max_by_key(|(tuple, count)| (**count, std::cmp::Reverse(**tuple)))
        .map(|(tuple, count)| (*tuple, *count));

    let Some(((billing_index, price_index, total_index), count)) = winner else {
        debug!("no line solved individually; delegating to the full solver");
        return delegate(rows, description_column, tolerance);
    };

    let confidence = count as f64 / rows.len() as f64;
    let found = confidence >= options.min_consensus;

    debug!(
        "consensus mapping ({}, {}, {}): {}/{} lines agree",
        billing_index, price_index, total_index, count, rows.len()
    );

    ConsensusSolve {
        found,
        mapping: Some(ColumnMapping {
            billing_index,
            price_index,
            total_index,
            pack_count_index: None,
            pack_weight_index: None,
            source: MappingSource::Consensus,
            confidence,
        }),
        confidence,
    }
}

fn delegate(
    rows: &[Vec<Cell>],
    description_column: Option<usize>,
    tolerance: &Tolerance,
) -> ConsensusSolve {
    let solve = solve_columns(rows, description_column, tolerance);
    let confidence = solve.mapping.as_ref().map_or(0.0, |m| m.confidence);
    ConsensusSolve {
        found: solve.found,
        mapping: solve.mapping,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(cells: &[&str]) -> Vec<Cell> {
        cells.iter().map(|&c| Cell::from(c)).collect()
    }

    fn seafood_rows() -> Vec<Vec<Cell>> {
        vec![
            row(&["SF-10234", "SAUMON ATLANTIQUE", "2", "2", "22.30", "lb", "14.85", "331.16"]),
            row(&["SF-10425", "CREVETTES TIGRE", "1", "1", "10.00", "lb", "8.95", "89.50"]),
            row(&["SF-10512", "HOMARD VIVANT", "4", "4", "5.10", "lb", "28.95", "147.65"]),
            row(&["SF-10731", "PÉTONCLES U10", "3", "3", "15.20", "lb", "12.50", "190.00"]),
        ]
    }

    #[test]
    fn test_unanimous_consensus() {
        let solve = solve_columns_with_consensus(
            &seafood_rows(),
            Some(1),
            &ConsensusOptions::default(),
            &Tolerance::default(),
        );

        assert!(solve.found);
        assert_eq!(solve.confidence, 1.0);
        let mapping = solve.mapping.unwrap();
        assert_eq!(mapping.source, MappingSource::Consensus);
        assert_eq!(
            (mapping.billing_index, mapping.price_index, mapping.total_index),
            (4, 6, 7)
        );
    }

    #[test]
    fn test_below_threshold_still_returns_best_vote() {
        let mut rows = seafood_rows();
        // one garbled row that solves to nothing
        rows.push(row(&["SF-99999", "LIGNE ILLISIBLE", "7", "7", "3.10", "lb", "9.99", "500.00"]));

        let solve = solve_columns_with_consensus(
            &rows,
            Some(1),
            &ConsensusOptions::default(),
            &Tolerance::default(),
        );

        assert!(!solve.found);
        assert_eq!(solve.confidence, 0.8);
        let mapping = solve.mapping.unwrap();
        assert_eq!(mapping.billing_index, 4);
    }

    #[test]
    fn test_lower_threshold_accepts_majority() {
        let mut rows = seafood_rows();
        rows.push(row(&["SF-99999", "LIGNE ILLISIBLE", "7", "7", "3.10", "lb", "9.99", "500.00"]));

        let options = ConsensusOptions { min_consensus: 0.75 };
        let solve =
            solve_columns_with_consensus(&rows, Some(1), &options, &Tolerance::default());
        assert!(solve.found);
    }

    #[test]
    fn test_two_rows_delegate_to_solver() {
        let rows = vec![
            row(&["CH001", "Cheddar", "3", "3", "12.45", "kg", "8.50", "105.83"]),
            row(&["CH002", "Brie", "2", "2", "8.40", "kg", "12.00", "100.80"]),
        ];
        let solve = solve_columns_with_consensus(
            &rows,
            Some(1),
            &ConsensusOptions::default(),
            &Tolerance::default(),
        );

        assert!(solve.found);
        assert_eq!(solve.mapping.unwrap().source, MappingSource::Exact);
    }

    #[test]
    fn test_no_individual_solution_falls_back() {
        let rows = vec![
            row(&["A1", "1", "9.99", "50.00"]),
            row(&["A2", "2", "9.99", "70.00"]),
            row(&["A3", "3", "9.99", "90.00"]),
        ];
        let solve = solve_columns_with_consensus(
            &rows,
            None,
            &ConsensusOptions::default(),
            &Tolerance::default(),
        );

        assert!(!solve.found);
        assert_eq!(solve.mapping.unwrap().source, MappingSource::Derived);
        assert_eq!(solve.confidence, 0.25);
    }
}
