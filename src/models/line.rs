//! Input value types for line validation.

use serde::{Deserialize, Serialize};

/// A raw table cell as delivered by the extraction layer.
///
/// Vision/OCR output mixes strings, numbers and blanks freely, so the core
/// accepts all three and lets the numeric parser decide what is usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// A numeric cell that was already parsed upstream.
    Number(f64),
    /// Raw cell text.
    Text(String),
    /// A blank or null cell.
    Empty,
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

/// Named candidate fields for one invoice line.
///
/// Every slot is an explicit optional: upstream extraction populates whatever
/// it could read, and the formula matcher skips any hypothesis whose inputs
/// are absent instead of probing for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineFields {
    /// Ordered quantity (usually cases).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    /// Quantity actually charged (e.g. billed weight in kg).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_quantity: Option<f64>,

    /// Shipped or catch weight.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Units per case when the pack format is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_count: Option<f64>,

    /// Size of each unit in the pack.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_weight: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<f64>,

    /// Free-text item description; may embed a pack notation like "4/5LB".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_from_impls() {
        assert_eq!(Cell::from(12.5), Cell::Number(12.5));
        assert_eq!(Cell::from("kg"), Cell::Text("kg".to_string()));
    }

    #[test]
    fn test_cell_untagged_serde() {
        let row: Vec<Cell> = serde_json::from_str(r#"["CH001", 3, "12.45", null]"#).unwrap();
        assert_eq!(
            row,
            vec![
                Cell::Text("CH001".to_string()),
                Cell::Number(3.0),
                Cell::Text("12.45".to_string()),
                Cell::Empty,
            ]
        );
    }

    #[test]
    fn test_line_fields_partial_deserialization() {
        let line: LineFields =
            serde_json::from_str(r#"{"unit_price": 8.5, "total_price": 105.83}"#).unwrap();
        assert_eq!(line.unit_price, Some(8.5));
        assert_eq!(line.quantity, None);
        assert_eq!(line.description, None);
    }
}
