use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::CompareError;

/// Column holding the reading timestamp.
pub const TIMESTAMP_COLUMN: &str = "terminal_date";
/// Column holding the temperature reading (°C).
pub const TEMPERATURE_COLUMN: &str = "temperature";
/// Column holding the relative humidity reading (%).
pub const HUMIDITY_COLUMN: &str = "humidity";

/// Columns every dataset must carry, in the order they are reported when
/// missing.
pub const REQUIRED_COLUMNS: [&str; 3] = [TIMESTAMP_COLUMN, TEMPERATURE_COLUMN, HUMIDITY_COLUMN];

// ── Records ───────────────────────────────────────────────────────────────────

/// One row of a dataset as parsed from disk.
///
/// `timestamp` is `None` when the cell could not be parsed; such records
/// never reach aggregation. Empty or non-numeric measurement cells are
/// stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub timestamp: Option<NaiveDateTime>,
    pub temperature: f64,
    pub humidity: f64,
}

impl RawRecord {
    /// Convert into a [`Reading`], dropping records without a valid
    /// timestamp.
    pub fn into_reading(self) -> Option<Reading> {
        let timestamp = self.timestamp?;
        Some(Reading::new(timestamp, self.temperature, self.humidity))
    }
}

/// A record that survived the timestamp filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    /// Wall-clock time in the dataset's own timezone.
    pub timestamp: NaiveDateTime,
    /// `timestamp` truncated to the calendar day.
    pub date: NaiveDate,
    pub temperature: f64,
    pub humidity: f64,
}

impl Reading {
    pub fn new(timestamp: NaiveDateTime, temperature: f64, humidity: f64) -> Self {
        Self {
            timestamp,
            date: timestamp.date(),
            temperature,
            humidity,
        }
    }
}

// ── DailySummary ──────────────────────────────────────────────────────────────

/// Six summary statistics for one dataset on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub temp_max: f64,
    pub temp_min: f64,
    pub temp_avg: f64,
    pub hum_max: f64,
    pub hum_min: f64,
    pub hum_avg: f64,
    /// Label of the dataset this row was aggregated from.
    pub label: String,
}

impl DailySummary {
    /// Look up the value of a single statistic.
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::TempMax => self.temp_max,
            Metric::TempMin => self.temp_min,
            Metric::TempAvg => self.temp_avg,
            Metric::HumAvg => self.hum_avg,
            Metric::HumMin => self.hum_min,
            Metric::HumMax => self.hum_max,
        }
    }
}

// ── Metric ────────────────────────────────────────────────────────────────────

/// The fixed set of daily statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    TempMax,
    TempMin,
    TempAvg,
    HumAvg,
    HumMin,
    HumMax,
}

impl Metric {
    /// All metrics in chart order.
    pub const ALL: [Metric; 6] = [
        Metric::TempMax,
        Metric::TempMin,
        Metric::TempAvg,
        Metric::HumAvg,
        Metric::HumMin,
        Metric::HumMax,
    ];

    /// Column-style key, e.g. `"temp_max"`.
    pub fn key(self) -> &'static str {
        match self {
            Metric::TempMax => "temp_max",
            Metric::TempMin => "temp_min",
            Metric::TempAvg => "temp_avg",
            Metric::HumAvg => "hum_avg",
            Metric::HumMin => "hum_min",
            Metric::HumMax => "hum_max",
        }
    }

    /// Chart title, e.g. `"Temp Max"`.
    pub fn title(self) -> &'static str {
        match self {
            Metric::TempMax => "Temp Max",
            Metric::TempMin => "Temp Min",
            Metric::TempAvg => "Temp Avg",
            Metric::HumAvg => "Hum Avg",
            Metric::HumMin => "Hum Min",
            Metric::HumMax => "Hum Max",
        }
    }

    /// Y-axis label including the unit.
    pub fn axis_label(self) -> &'static str {
        match self {
            Metric::TempMax => "Max Temperature (°C)",
            Metric::TempMin => "Min Temperature (°C)",
            Metric::TempAvg => "Avg Temperature (°C)",
            Metric::HumAvg => "Avg Humidity (%)",
            Metric::HumMin => "Min Humidity (%)",
            Metric::HumMax => "Max Humidity (%)",
        }
    }

    pub fn is_temperature(self) -> bool {
        matches!(self, Metric::TempMax | Metric::TempMin | Metric::TempAvg)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Year alignment ────────────────────────────────────────────────────────────

/// How overlay series are keyed when aligning rows onto a day-of-year axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    /// Exactly one dataset: one series per year, keyed by the year alone.
    SingleDataset,
    /// Two or more datasets: one series per (label, year) pair.
    MultiDataset,
}

impl AlignmentPolicy {
    /// Pick the policy from the number of datasets that contributed rows.
    pub fn for_dataset_count(count: usize) -> Self {
        if count >= 2 {
            AlignmentPolicy::MultiDataset
        } else {
            AlignmentPolicy::SingleDataset
        }
    }

    /// Build the overlay series key for a row.
    pub fn series_key(self, label: &str, year: i32) -> String {
        match self {
            AlignmentPolicy::SingleDataset => year.to_string(),
            AlignmentPolicy::MultiDataset => format!("{}_{}", label, year),
        }
    }
}

/// A [`DailySummary`] placed on a shared annual axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearAlignedRow {
    #[serde(flatten)]
    pub summary: DailySummary,
    pub year: i32,
    /// 1-based ordinal within `year`; Feb-29 is day 60 in leap years.
    pub day_of_year: u32,
    pub series_key: String,
}

impl YearAlignedRow {
    pub fn new(summary: DailySummary, policy: AlignmentPolicy) -> Self {
        let year = summary.date.year();
        let day_of_year = summary.date.ordinal();
        let series_key = policy.series_key(&summary.label, year);
        Self {
            summary,
            year,
            day_of_year,
            series_key,
        }
    }
}

// ── Warnings ──────────────────────────────────────────────────────────────────

/// A dataset that was skipped, with the reason shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetWarning {
    pub label: String,
    pub reason: String,
}

impl DatasetWarning {
    pub fn new(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reason: reason.into(),
        }
    }

    pub fn from_error(label: impl Into<String>, err: &CompareError) -> Self {
        Self::new(label, err.to_string())
    }
}

impl fmt::Display for DatasetWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.reason)
    }
}

// ── Labels ────────────────────────────────────────────────────────────────────

/// Derive a dataset label from its file name, stripping the last extension.
///
/// `"data/sensorA.csv"` → `"sensorA"`, `"room.2023.csv"` → `"room.2023"`.
pub fn label_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn summary(date: &str, label: &str) -> DailySummary {
        DailySummary {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            temp_max: 14.0,
            temp_min: 10.0,
            temp_avg: 12.0,
            hum_max: 50.0,
            hum_min: 40.0,
            hum_avg: 45.0,
            label: label.to_string(),
        }
    }

    // ── RawRecord / Reading ───────────────────────────────────────────────────

    #[test]
    fn test_raw_record_without_timestamp_is_dropped() {
        let raw = RawRecord {
            timestamp: None,
            temperature: 10.0,
            humidity: 50.0,
        };
        assert!(raw.into_reading().is_none());
    }

    #[test]
    fn test_reading_carries_calendar_date() {
        let raw = RawRecord {
            timestamp: Some(ts("2023-01-01T23:59:59")),
            temperature: 10.0,
            humidity: 50.0,
        };
        let reading = raw.into_reading().unwrap();
        assert_eq!(reading.date, NaiveDate::from_ymd_opt(2023, 1, 1).unwrap());
        assert_eq!(reading.temperature, 10.0);
    }

    // ── Metric ────────────────────────────────────────────────────────────────

    #[test]
    fn test_metric_chart_order() {
        let keys: Vec<&str> = Metric::ALL.iter().map(|m| m.key()).collect();
        assert_eq!(
            keys,
            vec!["temp_max", "temp_min", "temp_avg", "hum_avg", "hum_min", "hum_max"]
        );
    }

    #[test]
    fn test_metric_value_lookup() {
        let s = summary("2023-01-01", "a");
        assert_eq!(s.value(Metric::TempMax), 14.0);
        assert_eq!(s.value(Metric::TempMin), 10.0);
        assert_eq!(s.value(Metric::TempAvg), 12.0);
        assert_eq!(s.value(Metric::HumMax), 50.0);
        assert_eq!(s.value(Metric::HumMin), 40.0);
        assert_eq!(s.value(Metric::HumAvg), 45.0);
    }

    #[test]
    fn test_metric_display_is_key() {
        assert_eq!(Metric::TempAvg.to_string(), "temp_avg");
        assert_eq!(Metric::HumMin.to_string(), "hum_min");
    }

    #[test]
    fn test_metric_labels() {
        assert_eq!(Metric::TempMax.title(), "Temp Max");
        assert_eq!(Metric::HumAvg.axis_label(), "Avg Humidity (%)");
        assert!(Metric::TempMin.is_temperature());
        assert!(!Metric::HumMax.is_temperature());
    }

    // ── AlignmentPolicy ───────────────────────────────────────────────────────

    #[test]
    fn test_policy_for_dataset_count() {
        assert_eq!(
            AlignmentPolicy::for_dataset_count(1),
            AlignmentPolicy::SingleDataset
        );
        assert_eq!(
            AlignmentPolicy::for_dataset_count(2),
            AlignmentPolicy::MultiDataset
        );
        assert_eq!(
            AlignmentPolicy::for_dataset_count(0),
            AlignmentPolicy::SingleDataset
        );
    }

    #[test]
    fn test_series_key_by_policy() {
        assert_eq!(
            AlignmentPolicy::SingleDataset.series_key("sensorA", 2023),
            "2023"
        );
        assert_eq!(
            AlignmentPolicy::MultiDataset.series_key("sensorA", 2023),
            "sensorA_2023"
        );
    }

    #[test]
    fn test_year_aligned_row_leap_day_is_60() {
        let row = YearAlignedRow::new(summary("2024-02-29", "a"), AlignmentPolicy::SingleDataset);
        assert_eq!(row.year, 2024);
        assert_eq!(row.day_of_year, 60);
        assert_eq!(row.series_key, "2024");
    }

    #[test]
    fn test_year_aligned_row_serializes_flat() {
        let row = YearAlignedRow::new(summary("2023-03-01", "a"), AlignmentPolicy::MultiDataset);
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["label"], "a");
        assert_eq!(json["day_of_year"], 60);
        assert_eq!(json["series_key"], "a_2023");
        assert_eq!(json["date"], "2023-03-01");
    }

    // ── DatasetWarning ────────────────────────────────────────────────────────

    #[test]
    fn test_dataset_warning_from_schema_error() {
        let err = CompareError::schema("sensorB", &["humidity"]);
        let warning = DatasetWarning::from_error("sensorB", &err);
        assert_eq!(warning.label, "sensorB");
        assert!(warning.reason.contains("humidity"));
        assert!(warning.to_string().starts_with("sensorB: "));
    }

    // ── label_from_path ───────────────────────────────────────────────────────

    #[test]
    fn test_label_from_path_strips_extension() {
        assert_eq!(label_from_path(Path::new("data/sensorA.csv")), "sensorA");
        assert_eq!(label_from_path(Path::new("room.2023.csv")), "room.2023");
        assert_eq!(label_from_path(Path::new("noext")), "noext");
    }
}
