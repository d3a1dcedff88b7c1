//! Combines per-dataset daily summaries into one comparison table.

use chrono::NaiveDate;
use compare_core::error::{CompareError, Result};
use compare_core::models::{DailySummary, Metric};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ── UnifiedTable ──────────────────────────────────────────────────────────────

/// All daily summaries across every dataset, each row keeping its label.
///
/// Rows appear in input dataset order, each dataset's rows in ascending date
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedTable {
    rows: Vec<DailySummary>,
    dataset_count: usize,
}

/// One line of a metric chart: a label's `(date, value)` points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl UnifiedTable {
    pub fn rows(&self) -> &[DailySummary] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of datasets that contributed at least one row.
    pub fn dataset_count(&self) -> usize {
        self.dataset_count
    }

    /// Distinct labels in order of first appearance.
    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !labels.contains(&row.label.as_str()) {
                labels.push(&row.label);
            }
        }
        labels
    }

    /// Project the table onto one metric, one series per label.
    ///
    /// Days where the metric had no valid readings are left out of the
    /// series rather than plotted as zero.
    pub fn metric_series(&self, metric: Metric) -> Vec<MetricSeries> {
        let mut series: Vec<MetricSeries> = self
            .labels()
            .into_iter()
            .map(|label| MetricSeries {
                label: label.to_string(),
                points: Vec::new(),
            })
            .collect();

        for row in &self.rows {
            let value = row.value(metric);
            if value.is_nan() {
                continue;
            }
            if let Some(s) = series.iter_mut().find(|s| s.label == row.label) {
                s.points.push((row.date, value));
            }
        }

        series
    }
}

// ── DatasetMerger ─────────────────────────────────────────────────────────────

pub struct DatasetMerger;

impl DatasetMerger {
    /// Concatenate per-dataset summaries without deduplication.
    ///
    /// Fails with [`CompareError::EmptyResult`] when no dataset produced any
    /// row.
    pub fn merge(datasets: Vec<Vec<DailySummary>>) -> Result<UnifiedTable> {
        let dataset_count = datasets.iter().filter(|d| !d.is_empty()).count();
        let rows: Vec<DailySummary> = datasets.into_iter().flatten().collect();

        if rows.is_empty() {
            return Err(CompareError::EmptyResult);
        }

        debug!(
            "Merged {} row(s) from {} dataset(s)",
            rows.len(),
            dataset_count
        );

        Ok(UnifiedTable {
            rows,
            dataset_count,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
