//! Learned per-vendor, per-item corrections.
//!
//! The vendor-profile store is owned by the surrounding application; this
//! core only accepts an already-resolved record and folds it into a line
//! before formula matching. A missing or partially populated record means
//! "no correction available", never an error.

use serde::{Deserialize, Serialize};

use super::line::LineFields;

/// A user-confirmed billing interpretation for one vendor item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorItemCorrection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_code: Option<String>,

    /// Pack notation as printed on the invoice, e.g. "4/5LB".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Confirmed billing quantity per ordered case.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// What the unit measures (weight, volume, count).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pack_count: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_value: Option<f64>,

    /// Total billable quantity per case (pack count × unit value).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_value: Option<f64>,
}

/// Fold a learned correction into a line before formula matching.
///
/// A confirmed `value` overrides the billing quantity directly; a confirmed
/// pack shape fills the pack slots and leaves the case multiplication to the
/// matcher. Records that carry neither fall through unchanged.
pub fn apply_correction(
    line: &LineFields,
    correction: Option<&VendorItemCorrection>,
) -> LineFields {
    let mut resolved = line.clone();

    let Some(correction) = correction else {
        return resolved;
    };

    if let Some(value) = correction.value {
        resolved.billing_quantity = Some(value);
    } else if let (Some(count), Some(each)) = (correction.pack_count, correction.unit_value) {
        resolved.pack_count = Some(count);
        resolved.pack_weight = Some(each);
    } else if let Some(total) = correction.total_value {
        resolved.pack_count = Some(1.0);
        resolved.pack_weight = Some(total);
    }

    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn line() -> LineFields {
        LineFields {
            quantity: Some(2.0),
            unit_price: Some(2.5),
            total_price: Some(100.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_correction_is_a_no_op() {
        assert_eq!(apply_correction(&line(), None), line());
    }

    #[test]
    fn test_empty_record_falls_through() {
        let correction = VendorItemCorrection {
            item_code: Some("SF-10425".to_string()),
            unit: Some("lb".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_correction(&line(), Some(&correction)), line());
    }

    #[test]
    fn test_confirmed_value_overrides_billing_quantity() {
        let correction = VendorItemCorrection {
            value: Some(40.0),
            ..Default::default()
        };
        let resolved = apply_correction(&line(), Some(&correction));
        assert_eq!(resolved.billing_quantity, Some(40.0));
        // the ordered quantity is left alone for diagnostics
        assert_eq!(resolved.quantity, Some(2.0));
    }

    #[test]
    fn test_pack_shape_fills_pack_slots() {
        let correction = VendorItemCorrection {
            pack_count: Some(4.0),
            unit_value: Some(5.0),
            ..Default::default()
        };
        let resolved = apply_correction(&line(), Some(&correction));
        assert_eq!(resolved.pack_count, Some(4.0));
        assert_eq!(resolved.pack_weight, Some(5.0));
        assert_eq!(resolved.billing_quantity, None);
    }

    #[test]
    fn test_total_only_record_becomes_single_pack() {
        let correction = VendorItemCorrection {
            total_value: Some(20.0),
            ..Default::default()
        };
        let resolved = apply_correction(&line(), Some(&correction));
        assert_eq!(resolved.pack_count, Some(1.0));
        assert_eq!(resolved.pack_weight, Some(20.0));
    }
}
