use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A company valuation record, the unit the player compares. Identifiers
/// are unique within a candidate pool.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: String,
    pub name: String,
    pub description: String,
    pub valuation: f64,
    pub image_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// Valuation rounded to the figure the player actually sees: whole
    /// billions at or above 1e9, whole millions below. Guesses are judged
    /// on this figure, so two companies that render the same number are
    /// never a losing comparison.
    pub fn rounded_valuation(&self) -> f64 {
        rounded_display_value(self.valuation)
    }

    pub fn display_valuation(&self) -> String {
        format_valuation(self.valuation)
    }
}

pub fn rounded_display_value(valuation: f64) -> f64 {
    if valuation >= 1e9 {
        (valuation / 1e9).round() * 1e9
    } else {
        (valuation / 1e6).round() * 1e6
    }
}

pub fn format_valuation(valuation: f64) -> String {
    if valuation >= 1e9 {
        format!("{} B", (valuation / 1e9).round() as i64)
    } else {
        format!("{} M", (valuation / 1e6).round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_billions_and_millions() {
        assert_eq!(format_valuation(180_000_000_000.0), "180 B");
        assert_eq!(format_valuation(140_000_000_000.0), "140 B");
        assert_eq!(format_valuation(140_000_000.0), "140 M");
        assert_eq!(format_valuation(950_000_000.0), "950 M");
    }

    #[test]
    fn rounds_to_the_displayed_bucket() {
        assert_eq!(rounded_display_value(10_400_000_000.0), 10e9);
        assert_eq!(rounded_display_value(10_490_000_000.0), 10e9);
        assert_eq!(rounded_display_value(10_500_000_000.0), 11e9);
        assert_eq!(rounded_display_value(499_999.0), 0.0);
    }

    #[test]
    fn near_boundary_values_round_into_the_same_figure() {
        // 999.6 M displays as "1000 M" and 1.0 B as "1 B"; both round to 1e9.
        assert_eq!(
            rounded_display_value(999_600_000.0),
            rounded_display_value(1_000_000_000.0)
        );
    }
}
