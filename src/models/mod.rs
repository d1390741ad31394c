//! Value types shared across the validation core.

pub mod correction;
pub mod line;
pub mod result;

pub use correction::{apply_correction, VendorItemCorrection};
pub use line::{Cell, LineFields};
pub use result::{
    ColumnMapping, FormulaCandidate, FormulaType, LineValidationResult, MappingSource,
    ValidationSummary,
};
