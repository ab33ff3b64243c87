//! Domain types shared across the service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ── Player records ────────────────────────────────────────────────────

/// One processed leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(default)]
    pub player_name: String,
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub swings: Option<u64>,
    #[serde(default)]
    pub bat_speed: Option<f64>,
    #[serde(default)]
    pub swing_length: Option<f64>,
    /// Absent whenever the inputs cannot produce a defined ratio.
    #[serde(default)]
    pub power_plus: Option<f64>,
    #[serde(default)]
    pub grade: Grade,
    /// Remaining upstream columns, passed through untouched.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PlayerRecord {
    /// Field names owned by the typed struct; upstream columns with these
    /// names never go into `extra`.
    pub const FIELD_NAMES: [&'static str; 7] = [
        "player_name",
        "team",
        "swings",
        "bat_speed",
        "swing_length",
        "power_plus",
        "grade",
    ];

    /// Swing count, treating an absent count as zero.
    pub fn swing_count(&self) -> u64 {
        self.swings.unwrap_or(0)
    }
}

/// Processed records in upstream order.
pub type Dataset = Vec<PlayerRecord>;

// ── Grades ────────────────────────────────────────────────────────────

/// Discrete Power+ band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "Elite")]
    Elite,
    #[serde(rename = "Above Average")]
    AboveAverage,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Below Average")]
    BelowAverage,
    #[serde(rename = "Poor")]
    Poor,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Grade {
    pub const ALL: [Grade; 6] = [
        Grade::Elite,
        Grade::AboveAverage,
        Grade::Average,
        Grade::BelowAverage,
        Grade::Poor,
        Grade::NotAvailable,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Grade::Elite => "Elite",
            Grade::AboveAverage => "Above Average",
            Grade::Average => "Average",
            Grade::BelowAverage => "Below Average",
            Grade::Poor => "Poor",
            Grade::NotAvailable => "N/A",
        }
    }
}

impl Default for Grade {
    fn default() -> Self {
        Grade::NotAvailable
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Raw upstream table ────────────────────────────────────────────────

/// Header and rows of the upstream CSV, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_serializes_as_display_label() {
        let json = serde_json::to_string(&Grade::AboveAverage).unwrap();
        assert_eq!(json, "\"Above Average\"");

        let parsed: Grade = serde_json::from_str("\"N/A\"").unwrap();
        assert_eq!(parsed, Grade::NotAvailable);
    }

    #[test]
    fn test_record_flattens_extra_columns() {
        let mut extra = BTreeMap::new();
        extra.insert("id".to_string(), serde_json::json!(665742));
        let record = PlayerRecord {
            player_name: "Soto, Juan".into(),
            team: "NYM".into(),
            swings: Some(412),
            bat_speed: Some(75.1),
            swing_length: None,
            power_plus: None,
            grade: Grade::NotAvailable,
            extra,
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], 665742);
        assert!(value["power_plus"].is_null());
        assert_eq!(value["grade"], "N/A");

        let back: PlayerRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
