//! Per-day aggregation of sensor readings.
//!
//! Groups a dataset's readings by calendar date and reduces each group to
//! the six [`DailySummary`] statistics.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use compare_core::models::{DailySummary, Reading};
use tracing::debug;

// ── MetricStats ───────────────────────────────────────────────────────────────

/// Running min/max/mean over one measurement column.
///
/// `NaN` inputs are skipped; a column with no valid input reports `NaN` for
/// every statistic.
#[derive(Debug, Clone, Copy)]
pub struct MetricStats {
    pub count: u32,
    pub sum: f64,
    pub min: f64,
    pub max: f64,
}

impl Default for MetricStats {
    fn default() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl MetricStats {
    pub fn add(&mut self, value: f64) {
        if value.is_nan() {
            return;
        }
        self.count += 1;
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    pub fn max(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.max
        }
    }

    pub fn min(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.min
        }
    }

    /// Arithmetic mean of the valid values, kept within `[min, max]` when
    /// rounding in the running sum would push it outside.
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            (self.sum / f64::from(self.count)).clamp(self.min, self.max)
        }
    }
}

// ── DayBucket ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct DayBucket {
    temperature: MetricStats,
    humidity: MetricStats,
}

impl DayBucket {
    fn add(&mut self, reading: &Reading) {
        self.temperature.add(reading.temperature);
        self.humidity.add(reading.humidity);
    }

    fn into_summary(self, date: NaiveDate, label: &str) -> DailySummary {
        DailySummary {
            date,
            temp_max: self.temperature.max(),
            temp_min: self.temperature.min(),
            temp_avg: self.temperature.mean(),
            hum_max: self.humidity.max(),
            hum_min: self.humidity.min(),
            hum_avg: self.humidity.mean(),
            label: label.to_string(),
        }
    }
}

// ── DailyAggregator ───────────────────────────────────────────────────────────

/// Stateless helper that reduces readings to one summary per date.
pub struct DailyAggregator;

impl DailyAggregator {
    /// Aggregate `readings` by calendar date, tagging every row with `label`.
    ///
    /// Returns one row per distinct date, in ascending date order. Empty
    /// input yields an empty vector.
    pub fn aggregate(label: &str, readings: &[Reading]) -> Vec<DailySummary> {
        let mut days: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
        for reading in readings {
            days.entry(reading.date).or_default().add(reading);
        }

        debug!(
            "Dataset {}: {} readings aggregated into {} day(s)",
            label,
            readings.len(),
            days.len()
        );

        days.into_iter()
            .map(|(date, bucket)| bucket.into_summary(date, label))
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
