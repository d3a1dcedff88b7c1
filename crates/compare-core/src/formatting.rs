use chrono::NaiveDate;

use crate::models::Metric;

/// Placeholder shown for a statistic with no valid readings.
pub const MISSING_VALUE: &str = "-";

/// Format a measurement with a fixed number of decimal places.
///
/// Non-finite values (a metric with no valid readings on that day) render
/// as [`MISSING_VALUE`].
///
/// # Examples
///
/// ```
/// use compare_core::formatting::format_measurement;
///
/// assert_eq!(format_measurement(12.0, 1), "12.0");
/// assert_eq!(format_measurement(-3.456, 2), "-3.46");
/// assert_eq!(format_measurement(f64::NAN, 1), "-");
/// ```
pub fn format_measurement(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return MISSING_VALUE.to_string();
    }
    let rendered = format!("{:.prec$}", value, prec = decimals);
    // Avoid "-0.0" for values that round to zero.
    if rendered.starts_with('-') && rendered[1..].chars().all(|c| c == '0' || c == '.') {
        rendered[1..].to_string()
    } else {
        rendered
    }
}

/// Format a metric value with its unit, e.g. `"12.0 °C"` or `"45.0 %"`.
pub fn format_metric_value(metric: Metric, value: f64) -> String {
    let number = format_measurement(value, 1);
    if number == MISSING_VALUE {
        return number;
    }
    if metric.is_temperature() {
        format!("{} °C", number)
    } else {
        format!("{} %", number)
    }
}

/// Format a 1-based day-of-year as a month/day tick label.
///
/// Ordinals are mapped through a non-leap reference year, so day 60 reads
/// `"Mar 01"` even though it is Feb-29 in a leap year; day 366 clamps to
/// `"Dec 31"`.
///
/// # Examples
///
/// ```
/// use compare_core::formatting::format_day_of_year;
///
/// assert_eq!(format_day_of_year(1), "Jan 01");
/// assert_eq!(format_day_of_year(60), "Mar 01");
/// assert_eq!(format_day_of_year(366), "Dec 31");
/// ```
pub fn format_day_of_year(day_of_year: u32) -> String {
    let ordinal = day_of_year.clamp(1, 365);
    NaiveDate::from_yo_opt(2001, ordinal)
        .map(|d| d.format("%b %d").to_string())
        .unwrap_or_else(|| day_of_year.to_string())
}

/// Format a calendar date the way axis ticks and table rows show it.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `"1 dataset"`, `"3 datasets"`.
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_measurement ───────────────────────────────────────────────────

    #[test]
    fn test_format_measurement_rounds() {
        assert_eq!(format_measurement(12.345, 1), "12.3");
        assert_eq!(format_measurement(45.0, 0), "45");
    }

    #[test]
    fn test_format_measurement_negative_zero() {
        assert_eq!(format_measurement(-0.04, 1), "0.0");
        assert_eq!(format_measurement(-0.06, 1), "-0.1");
    }

    #[test]
    fn test_format_measurement_non_finite() {
        assert_eq!(format_measurement(f64::NAN, 2), MISSING_VALUE);
        assert_eq!(format_measurement(f64::INFINITY, 2), MISSING_VALUE);
    }

    // ── format_metric_value ──────────────────────────────────────────────────

    #[test]
    fn test_format_metric_value_units() {
        assert_eq!(format_metric_value(Metric::TempAvg, 12.0), "12.0 °C");
        assert_eq!(format_metric_value(Metric::HumMin, 40.0), "40.0 %");
        assert_eq!(format_metric_value(Metric::HumMax, f64::NAN), "-");
    }

    // ── format_day_of_year ───────────────────────────────────────────────────

    #[test]
    fn test_format_day_of_year_bounds() {
        assert_eq!(format_day_of_year(0), "Jan 01");
        assert_eq!(format_day_of_year(365), "Dec 31");
        assert_eq!(format_day_of_year(182), "Jul 01");
    }

    // ── format_date / pluralize ──────────────────────────────────────────────

    #[test]
    fn test_format_date() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        assert_eq!(format_date(d), "2023-01-02");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "dataset"), "1 dataset");
        assert_eq!(pluralize(0, "dataset"), "0 datasets");
        assert_eq!(pluralize(3, "row"), "3 rows");
    }
}
