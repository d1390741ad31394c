//! Shared regex patterns for numeric and pack-format detection.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Pack notation embedded in a description: "4/5LB", "2/3KG", "4/2.5LB".
    /// The unit is mandatory so size grades like "16/20" do not match.
    pub static ref PACK_FORMAT: Regex = Regex::new(
        r"(?i)\b(\d{1,3})\s*/\s*(\d{1,4}(?:\.\d+)?)\s*(LBS?|KG|OZ|G|L)\b"
    ).unwrap();

    /// A currency-shaped amount: optional symbol, optional thousands grouping
    /// (US comma or French space), exactly two decimals.
    pub static ref AMOUNT_SHAPE: Regex = Regex::new(
        r"^[$€]?\s*\d{1,3}(?:[ ,\u{00a0}]?\d{3})*[.,]\d{2}$"
    ).unwrap();
}
