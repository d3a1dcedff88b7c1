//! Places daily summaries on a shared annual axis for cross-year overlays.

use compare_core::models::{AlignmentPolicy, DailySummary, YearAlignedRow};
use serde::{Deserialize, Serialize};

use crate::merger::UnifiedTable;

/// One overlay line: `(day_of_year, temp_avg)` points for one series key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSeries {
    pub key: String,
    pub points: Vec<(u32, f64)>,
}

pub struct YearAligner;

impl YearAligner {
    /// Derive year, day-of-year and series key for every row.
    ///
    /// Input order is preserved; nothing is filled in or interpolated.
    pub fn align(rows: &[DailySummary], policy: AlignmentPolicy) -> Vec<YearAlignedRow> {
        rows.iter()
            .cloned()
            .map(|summary| YearAlignedRow::new(summary, policy))
            .collect()
    }

    /// Align a merged table, choosing the policy from how many datasets
    /// contributed to it.
    pub fn align_table(table: &UnifiedTable) -> Vec<YearAlignedRow> {
        let policy = AlignmentPolicy::for_dataset_count(table.dataset_count());
        Self::align(table.rows(), policy)
    }

    /// Group aligned rows into overlay series in order of first appearance.
    ///
    /// Points within a series are ordered by day-of-year; days without a
    /// valid average temperature are left out.
    pub fn series(rows: &[YearAlignedRow]) -> Vec<YearSeries> {
        let mut series: Vec<YearSeries> = Vec::new();

        for row in rows {
            let idx = match series.iter().position(|s| s.key == row.series_key) {
                Some(idx) => idx,
                None => {
                    series.push(YearSeries {
                        key: row.series_key.clone(),
                        points: Vec::new(),
                    });
                    series.len() - 1
                }
            };
            if !row.summary.temp_avg.is_nan() {
                series[idx]
                    .points
                    .push((row.day_of_year, row.summary.temp_avg));
            }
        }

        for s in &mut series {
            s.points.sort_by_key(|(day, _)| *day);
        }
        series
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
