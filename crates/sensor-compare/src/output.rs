//! Non-interactive output modes: chart series as JSON, the unified table as
//! CSV.

use std::io::Write;

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use tracing::debug;

use compare_core::formatting::format_date;
use compare_core::models::DailySummary;
use compare_data::analysis::ComparisonReport;

/// One CSV output row. Missing statistics are written as empty cells.
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    date: String,
    label: &'a str,
    temp_max: Option<f64>,
    temp_min: Option<f64>,
    temp_avg: Option<f64>,
    hum_max: Option<f64>,
    hum_min: Option<f64>,
    hum_avg: Option<f64>,
}

impl<'a> From<&'a DailySummary> for CsvRow<'a> {
    fn from(row: &'a DailySummary) -> Self {
        let cell = |v: f64| if v.is_nan() { None } else { Some(v) };
        Self {
            date: format_date(row.date),
            label: &row.label,
            temp_max: cell(row.temp_max),
            temp_min: cell(row.temp_min),
            temp_avg: cell(row.temp_avg),
            hum_max: cell(row.hum_max),
            hum_min: cell(row.hum_min),
            hum_avg: cell(row.hum_avg),
        }
    }
}

/// Write the report's chart payload as pretty-printed JSON.
pub fn write_json<W: Write>(report: &ComparisonReport, mut writer: W) -> Result<()> {
    writeln!(writer, "{}", report.to_json()?)?;
    Ok(())
}

/// Write the unified table as CSV with a header row.
pub fn write_csv<W: Write>(report: &ComparisonReport, writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for row in report.table.rows() {
        writer.serialize(CsvRow::from(row))?;
    }
    writer.flush()?;
    debug!("Wrote {} CSV row(s)", report.table.len());
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────
