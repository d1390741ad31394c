//! Locale parsing and text-format rules.

pub mod numeric;
pub mod pack;
pub mod patterns;

pub use numeric::{parse_amount, parse_cell};
pub use pack::{extract_pack_format, PackFormat};
