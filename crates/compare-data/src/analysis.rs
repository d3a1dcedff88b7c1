//! Batch comparison pipeline.
//!
//! Parses and aggregates every dataset independently, collects per-dataset
//! failures as warnings, then merges and year-aligns the survivors into a
//! [`ComparisonReport`] ready for the UI and the exporters.

use chrono::Utc;
use compare_core::error::Result;
use compare_core::models::{AlignmentPolicy, DailySummary, DatasetWarning, Metric, YearAlignedRow};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::aggregator::DailyAggregator;
use crate::aligner::{YearAligner, YearSeries};
use crate::merger::{DatasetMerger, MetricSeries, UnifiedTable};
use crate::reader::{DatasetSource, RecordParser};

// ── Public types ──────────────────────────────────────────────────────────────

/// One dataset after parsing and daily aggregation.
#[derive(Debug, Clone)]
pub struct AggregatedDataset {
    pub source: DatasetSource,
    /// Readings that survived the timestamp filter.
    pub readings: usize,
    pub summaries: Vec<DailySummary>,
}

/// Result of running every dataset through parse + aggregate.
#[derive(Debug, Clone)]
pub struct BatchAnalysis {
    /// Successfully aggregated datasets, in input order.
    pub datasets: Vec<AggregatedDataset>,
    /// Datasets that were skipped and why, plus any discovery warnings
    /// attached through [`BatchAnalysis::with_warnings`].
    pub warnings: Vec<DatasetWarning>,
    /// Sources that failed to parse. Discovery warnings are not counted.
    pub datasets_skipped: usize,
    /// Wall-clock seconds spent parsing and aggregating.
    pub load_time_seconds: f64,
}

/// Metadata produced alongside the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// ISO-8601 timestamp when this report was generated.
    pub generated_at: String,
    pub datasets_loaded: usize,
    pub datasets_skipped: usize,
    /// Readings with a valid timestamp across all loaded datasets.
    pub readings_parsed: usize,
    pub rows_aggregated: usize,
    pub load_time_seconds: f64,
}

/// Everything the presentation layer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub metadata: ReportMetadata,
    pub policy: AlignmentPolicy,
    pub table: UnifiedTable,
    pub year_aligned: Vec<YearAlignedRow>,
    pub warnings: Vec<DatasetWarning>,
}

/// A single metric chart: its labels plus one series per dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricChart {
    pub metric: Metric,
    pub title: String,
    pub axis_label: String,
    pub series: Vec<MetricSeries>,
}

/// Chart-ready projection of a report, as written by `--output json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPayload {
    pub metadata: ReportMetadata,
    pub policy: AlignmentPolicy,
    pub metrics: Vec<MetricChart>,
    pub year_overlay: Vec<YearSeries>,
    pub warnings: Vec<DatasetWarning>,
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// Parse and aggregate a single dataset.
pub fn analyze_dataset(source: &DatasetSource) -> Result<AggregatedDataset> {
    let readings = RecordParser::parse_file(source)?;
    let summaries = DailyAggregator::aggregate(&source.label, &readings);
    Ok(AggregatedDataset {
        source: source.clone(),
        readings: readings.len(),
        summaries,
    })
}

/// Run every source through [`analyze_dataset`].
///
/// Per-dataset failures become warnings; the batch itself never fails.
pub fn analyze_datasets(sources: &[DatasetSource]) -> BatchAnalysis {
    let start = std::time::Instant::now();
    let mut datasets = Vec::with_capacity(sources.len());
    let mut warnings = Vec::new();

    for source in sources {
        match analyze_dataset(source) {
            Ok(dataset) => datasets.push(dataset),
            Err(e) => {
                if e.is_per_dataset() {
                    warn!("Skipping dataset {}: {}", source.label, e);
                } else {
                    error!("Unexpected failure on dataset {}: {}", source.label, e);
                }
                warnings.push(DatasetWarning::from_error(&source.label, &e));
            }
        }
    }

    let load_time_seconds = start.elapsed().as_secs_f64();
    info!(
        "Analyzed {} dataset(s), {} skipped, in {:.3}s",
        datasets.len(),
        warnings.len(),
        load_time_seconds
    );

    BatchAnalysis {
        datasets_skipped: warnings.len(),
        datasets,
        warnings,
        load_time_seconds,
    }
}

impl BatchAnalysis {
    /// Attach warnings produced before analysis (e.g. during discovery).
    pub fn with_warnings(mut self, mut earlier: Vec<DatasetWarning>) -> Self {
        earlier.append(&mut self.warnings);
        self.warnings = earlier;
        self
    }

    /// Total readings that reached aggregation.
    pub fn readings_parsed(&self) -> usize {
        self.datasets.iter().map(|d| d.readings).sum()
    }

    /// Total daily rows across all aggregated datasets.
    pub fn rows_aggregated(&self) -> usize {
        self.datasets.iter().map(|d| d.summaries.len()).sum()
    }

    /// Merge, align and package the batch.
    ///
    /// Fails with `EmptyResult` when no dataset produced a single row.
    pub fn build_report(self) -> Result<ComparisonReport> {
        let datasets_loaded = self.datasets.len();
        let readings_parsed = self.readings_parsed();

        let table = DatasetMerger::merge(self.datasets.into_iter().map(|d| d.summaries).collect())?;
        let policy = AlignmentPolicy::for_dataset_count(table.dataset_count());
        let year_aligned = YearAligner::align_table(&table);

        let metadata = ReportMetadata {
            generated_at: Utc::now().to_rfc3339(),
            datasets_loaded,
            datasets_skipped: self.datasets_skipped,
            readings_parsed,
            rows_aggregated: table.len(),
            load_time_seconds: self.load_time_seconds,
        };

        Ok(ComparisonReport {
            metadata,
            policy,
            table,
            year_aligned,
            warnings: self.warnings,
        })
    }
}

// ── ComparisonReport ──────────────────────────────────────────────────────────

impl ComparisonReport {
    pub fn metric_series(&self, metric: Metric) -> Vec<MetricSeries> {
        self.table.metric_series(metric)
    }

    pub fn year_series(&self) -> Vec<YearSeries> {
        YearAligner::series(&self.year_aligned)
    }

    /// Pretty-printed JSON of [`Self::chart_payload`].
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.chart_payload())?)
    }

    pub fn chart_payload(&self) -> ChartPayload {
        let metrics = Metric::ALL
            .into_iter()
            .map(|metric| MetricChart {
                metric,
                title: metric.title().to_string(),
                axis_label: metric.axis_label().to_string(),
                series: self.metric_series(metric),
            })
            .collect();

        ChartPayload {
            metadata: self.metadata.clone(),
            policy: self.policy,
            metrics,
            year_overlay: self.year_series(),
            warnings: self.warnings.clone(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
