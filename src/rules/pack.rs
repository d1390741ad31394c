//! Pack/weight notation embedded in item descriptions.
//!
//! Food suppliers print the case composition inside the description text,
//! e.g. "PÉTONCLES U10 DRY PACK 1/5LB" or "MESCLUN BIO 4/2.5LB". When no
//! numeric column explains a line's total, this notation often does.

use serde::{Deserialize, Serialize};

use super::patterns::PACK_FORMAT;

/// A parsed pack notation such as "4/5LB": four units of five pounds each.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackFormat {
    pub pack_count: f64,
    /// Size of each unit in the pack.
    pub unit_value: f64,
    /// Total billable quantity per case (pack count × unit value).
    pub total_value: f64,
    /// Lowercased unit token, e.g. "lb" or "kg".
    pub unit: String,
}

/// Extract the first pack notation found in free text.
///
/// Returns `None` when no "count/size+unit" token is present. Unit-less
/// slash pairs (shrimp size grades like "16/20") never match.
pub fn extract_pack_format(description: &str) -> Option<PackFormat> {
    let caps = PACK_FORMAT.captures(description)?;

    let pack_count: f64 = caps[1].parse().ok()?;
    let unit_value: f64 = caps[2].parse().ok()?;
    if pack_count <= 0.0 || unit_value <= 0.0 {
        return None;
    }

    Some(PackFormat {
        pack_count,
        unit_value,
        total_value: pack_count * unit_value,
        unit: caps[3].to_lowercase(),
    })
}
