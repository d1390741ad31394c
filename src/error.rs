//! Typed reasons for structural solve failures.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why column solving could not run on the given rows.
///
/// Carried on the result value, never returned as `Err`: callers branch on
/// `found` and `reason` rather than catching anything.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveReason {
    /// Solving needs at least two evidence rows.
    #[error("need at least 2 rows to solve columns, got {0}")]
    NotEnoughRows(usize),

    /// Fewer than two rows carried two or more numeric columns.
    #[error("rows have fewer than 2 numeric columns")]
    NotEnoughNumericColumns,

    /// No total/price column pair could be identified on the evidence rows.
    #[error("no price and total column pair could be identified")]
    NoPriceTotalPair,
}
