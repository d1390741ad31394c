//! Column-role inference for unlabeled invoice tables.

mod classifier;
mod consensus;
mod solver;

pub use classifier::{
    extract_numeric_cells, identify_billing_candidates, identify_price_column,
    identify_total_column, NumericCell,
};
pub use consensus::{solve_columns_with_consensus, ConsensusOptions, ConsensusSolve};
pub use solver::{solve_columns, ColumnSolve};
