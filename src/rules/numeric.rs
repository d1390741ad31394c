//! Locale-tolerant numeric parsing.
//!
//! Quebec supplier invoices mix US formatting ("1,234.56") with
//! French-Canadian formatting ("1 234,56") on the same page, so separator
//! roles are disambiguated by shape rather than by a configured locale.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::str::FromStr;

use crate::models::Cell;

/// Parse an amount string in US or French-Canadian formatting.
///
/// Currency symbols and grouping separators are stripped; a lone comma
/// followed by exactly two digits is a French decimal. Anything that is not
/// a number yields `None`, never an error.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | ' ' | '\u{00a0}'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = normalize_separators(&cleaned);
    Decimal::from_str(&normalized).ok()?.to_f64()
}

/// Parse any raw cell; already-numeric cells pass through unchanged.
pub fn parse_cell(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Number(value) if value.is_finite() => Some(*value),
        Cell::Number(_) => None,
        Cell::Text(text) => parse_amount(text),
        Cell::Empty => None,
    }
}

/// Rewrite separators so the string parses as a plain decimal.
fn normalize_separators(s: &str) -> String {
    let has_comma = s.contains(',');
    let has_dot = s.contains('.');

    match (has_comma, has_dot) {
        // Both present: the rightmost separator is the decimal point.
        (true, true) => {
            if s.rfind(',') > s.rfind('.') {
                s.replace('.', "").replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        // Comma only: a single comma with exactly two trailing digits is a
        // French decimal; otherwise commas are thousands grouping.
        (true, false) => {
            let decimal_part = s.rsplit(',').next().unwrap_or("");
            if s.matches(',').count() == 1
                && decimal_part.len() == 2
                && decimal_part.bytes().all(|b| b.is_ascii_digit())
            {
                s.replace(',', ".")
            } else {
                s.replace(',', "")
            }
        }
        _ => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_us_format() {
        assert_eq!(parse_amount("1,234.56"), Some(1234.56));
        assert_eq!(parse_amount("$10,500.00"), Some(10500.0));
        assert_eq!(parse_amount("105.83"), Some(105.83));
    }

    #[test]
    fn test_parse_french_format() {
        assert_eq!(parse_amount("12,50"), Some(12.5));
        assert_eq!(parse_amount("1 234,56"), Some(1234.56));
        assert_eq!(parse_amount("1\u{00a0}234,56"), Some(1234.56));
        assert_eq!(parse_amount("€1 250,00"), Some(1250.0));
    }

    #[test]
    fn test_comma_as_thousands_only() {
        assert_eq!(parse_amount("1,234"), Some(1234.0));
        assert_eq!(parse_amount("12,345"), Some(12345.0));
    }

    #[test]
    fn test_plain_and_negative() {
        assert_eq!(parse_amount("3"), Some(3.0));
        assert_eq!(parse_amount("-12.50"), Some(-12.5));
    }

    #[test]
    fn test_non_numeric_yields_none() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("kg"), None);
        assert_eq!(parse_amount("12.45kg"), None);
    }

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell(&Cell::Number(8.5)), Some(8.5));
        assert_eq!(parse_cell(&Cell::Number(f64::NAN)), None);
        assert_eq!(parse_cell(&Cell::Text("105.83".to_string())), Some(105.83));
        assert_eq!(parse_cell(&Cell::Text("kg".to_string())), None);
        assert_eq!(parse_cell(&Cell::Empty), None);
    }
}
