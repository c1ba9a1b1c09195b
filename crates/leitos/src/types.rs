use std::fmt::Display;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line item of the bed-occupancy table, as found in the page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BedRow {
    pub label: String,
    pub total: u32,
    pub occupied: u32,
}

impl BedRow {
    pub fn new(label: impl Into<String>, total: u32, occupied: u32) -> Self {
        Self {
            label: label.into(),
            total,
            occupied,
        }
    }
}

impl Display for BedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} — {}/{}", self.label, self.occupied, self.total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedCategory {
    AdultWard,
    PediatricWard,
    AdultIcu,
    PediatricIcu,
}

impl BedCategory {
    /// Order in which the dashboard table lists the categories.
    pub const LAYOUT: [BedCategory; 4] = [
        BedCategory::AdultWard,
        BedCategory::PediatricWard,
        BedCategory::AdultIcu,
        BedCategory::PediatricIcu,
    ];
}

impl Display for BedCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BedCategory::AdultWard => write!(f, "Adult ward"),
            BedCategory::PediatricWard => write!(f, "Pediatric ward"),
            BedCategory::AdultIcu => write!(f, "Adult ICU"),
            BedCategory::PediatricIcu => write!(f, "Pediatric ICU"),
        }
    }
}

/// What to do with a row reporting more occupied beds than it has.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// Keep the figures as published and notify the observer.
    #[default]
    Lenient,
    /// Reject the whole report.
    Strict,
}

/// Aggregated occupancy figures for one dashboard update.
///
/// Serialized field names are the keys existing downstream consumers of the
/// crawler expect. A rate is `None` when its group has no beds at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyReport {
    #[serde(rename = "TOTAL_ENFM")]
    pub ward_total: u64,
    #[serde(rename = "ATIVO_ENFM")]
    pub ward_active: u64,
    #[serde(rename = "TOTAL_UTI")]
    pub icu_total: u64,
    #[serde(rename = "ATIVO_UTI")]
    pub icu_active: u64,
    #[serde(rename = "OCUP_ENFM")]
    pub ward_occupancy_rate: Option<Decimal>,
    #[serde(rename = "OCUP_UTI")]
    pub icu_occupancy_rate: Option<Decimal>,
    #[serde(rename = "DATA")]
    pub report_date: String,
}

impl OccupancyReport {
    /// The report date as a calendar date, if it is one.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.report_date, "%d/%m/%Y").ok()
    }
}

fn fmt_rate(rate: Option<Decimal>) -> String {
    match rate {
        Some(rate) => format!("{:.2}%", rate * Decimal::ONE_HUNDRED),
        None => "n/a".to_string(),
    }
}

impl Display for OccupancyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ Bed occupancy ─ {}", self.report_date)?;
        writeln!(
            f,
            "│  Ward: {:>6} / {:<6} {}",
            self.ward_active,
            self.ward_total,
            fmt_rate(self.ward_occupancy_rate)
        )?;
        writeln!(
            f,
            "│  ICU:  {:>6} / {:<6} {}",
            self.icu_active,
            self.icu_total,
            fmt_rate(self.icu_occupancy_rate)
        )?;
        write!(f, "└─")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> OccupancyReport {
        OccupancyReport {
            ward_total: 150,
            ward_active: 120,
            icu_total: 0,
            icu_active: 0,
            ward_occupancy_rate: Some(Decimal::new(8, 1)),
            icu_occupancy_rate: None,
            report_date: "05/03/2021".to_string(),
        }
    }

    #[test]
    fn test_report_serializes_with_dashboard_keys() {
        let json = serde_json::to_value(sample_report()).expect("Failed to serialize");

        assert_eq!(json["TOTAL_ENFM"], 150);
        assert_eq!(json["ATIVO_ENFM"], 120);
        assert_eq!(json["TOTAL_UTI"], 0);
        assert_eq!(json["ATIVO_UTI"], 0);
        assert_eq!(json["OCUP_ENFM"], "0.8");
        assert!(json["OCUP_UTI"].is_null());
        assert_eq!(json["DATA"], "05/03/2021");
        assert_eq!(json.as_object().map(|o| o.len()), Some(7));
    }

    #[test]
    fn test_report_date_as_calendar_date() {
        let report = sample_report();
        assert_eq!(report.date(), NaiveDate::from_ymd_opt(2021, 3, 5));

        let bogus = OccupancyReport {
            report_date: "31/02/2021".to_string(),
            ..report
        };
        assert_eq!(bogus.date(), None);
    }

    #[test]
    fn test_report_display() {
        let text = sample_report().to_string();
        assert!(text.contains("05/03/2021"));
        assert!(text.contains("80.00%"));
        assert!(text.contains("n/a"));
    }
}
