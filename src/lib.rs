//! Arithmetic validation for OCR-extracted supplier invoices.
//!
//! Upstream vision/OCR extraction is unreliable about *which* quantity was
//! billed — ordered cases, billed weight, or pack count × pack size — so
//! this crate reconstructs the correct arithmetic relationship from the
//! numbers themselves. It provides:
//! - locale-tolerant numeric parsing (US and French-Canadian formats)
//! - pack-format extraction from free-text descriptions ("4/5LB")
//! - per-line formula matching over an ordered set of hypotheses
//! - column-role inference for unlabeled tables, with cross-line consensus
//! - invoice-level subtotal and TPS/TVQ tax-cascade validation
//!
//! Everything is a pure, synchronous function over value types: no I/O, no
//! shared state, and no fallible path. Malformed input degrades to `None`,
//! `found = false` or a typed `reason`, never an error, so callers branch on
//! the verdict instead of catching anything.

pub mod cascade;
pub mod columns;
pub mod error;
pub mod formula;
pub mod models;
pub mod rules;

pub use cascade::{validate_cascade, CascadeCheck, CascadeInput, CascadeResult};
pub use columns::{
    extract_numeric_cells, identify_billing_candidates, identify_price_column,
    identify_total_column, solve_columns, solve_columns_with_consensus, ColumnSolve,
    ConsensusOptions, ConsensusSolve, NumericCell,
};
pub use error::SolveReason;
pub use formula::{find_valid_formula, validate_all_lines, InvoiceValidation, Tolerance};
pub use models::{
    apply_correction, Cell, ColumnMapping, FormulaCandidate, FormulaType, LineFields,
    LineValidationResult, MappingSource, ValidationSummary, VendorItemCorrection,
};
pub use rules::{extract_pack_format, parse_amount, parse_cell, PackFormat};
