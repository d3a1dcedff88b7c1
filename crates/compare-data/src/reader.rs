//! CSV dataset discovery and parsing.
//!
//! Turns paths given on the command line into labelled [`DatasetSource`]s
//! and parses each CSV file into [`Reading`]s, dropping rows whose
//! timestamp cannot be parsed.

use std::io::Read;
use std::path::{Path, PathBuf};

use compare_core::error::{CompareError, Result};
use compare_core::models::{
    label_from_path, DatasetWarning, RawRecord, Reading, HUMIDITY_COLUMN, REQUIRED_COLUMNS,
    TEMPERATURE_COLUMN, TIMESTAMP_COLUMN,
};
use compare_core::time_utils::TimestampParser;
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::{debug, warn};

// ── DatasetSource ─────────────────────────────────────────────────────────────

/// One CSV file and the label its series are shown under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSource {
    pub label: String,
    pub path: PathBuf,
}

impl DatasetSource {
    /// Build a source labelled by the file name without its extension.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            label: label_from_path(&path),
            path,
        }
    }
}

// ── Discovery ─────────────────────────────────────────────────────────────────

/// Find all `.csv` files recursively under `dir`, sorted by path.
pub fn find_csv_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.exists() {
        warn!("Data path does not exist: {}", dir.display());
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && has_csv_extension(entry.path()))
        .map(|entry| entry.into_path())
        .collect();

    files.sort();
    files
}

/// Expand the given paths into dataset sources, preserving argument order.
///
/// Files are taken as-is (whatever their extension); directories are
/// searched for CSV files. A directory without any CSV file produces a
/// warning instead of a source.
pub fn discover_sources(paths: &[PathBuf]) -> (Vec<DatasetSource>, Vec<DatasetWarning>) {
    let mut sources = Vec::new();
    let mut warnings = Vec::new();

    for path in paths {
        if path.is_dir() {
            let files = find_csv_files(path);
            if files.is_empty() {
                let err = CompareError::NoDataFiles(path.clone());
                warn!("{}", err);
                warnings.push(DatasetWarning::from_error(
                    path.display().to_string(),
                    &err,
                ));
            }
            sources.extend(files.into_iter().map(DatasetSource::from_path));
        } else {
            sources.push(DatasetSource::from_path(path.clone()));
        }
    }

    debug!("Discovered {} dataset(s)", sources.len());
    sources
        .iter()
        .for_each(|s| debug!("  {} <- {}", s.label, s.path.display()));

    (sources, warnings)
}

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

// ── RecordParser ──────────────────────────────────────────────────────────────

/// Positions of the required columns within a dataset's header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    timestamp: usize,
    temperature: usize,
    humidity: usize,
}

impl ColumnIndex {
    /// Locate the required columns, failing with a schema error that lists
    /// every missing one.
    fn resolve(label: &str, headers: &StringRecord) -> Result<Self> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |column: &str| names.iter().position(|name| *name == column);

        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|column| find(column).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(CompareError::schema(label, &missing));
        }

        // Every lookup below succeeded in the `missing` check.
        match (
            find(TIMESTAMP_COLUMN),
            find(TEMPERATURE_COLUMN),
            find(HUMIDITY_COLUMN),
        ) {
            (Some(timestamp), Some(temperature), Some(humidity)) => Ok(Self {
                timestamp,
                temperature,
                humidity,
            }),
            _ => Err(CompareError::schema(label, &REQUIRED_COLUMNS)),
        }
    }
}

/// Parses one dataset into typed readings.
pub struct RecordParser;

impl RecordParser {
    /// Open and parse the file behind `source`.
    pub fn parse_file(source: &DatasetSource) -> Result<Vec<Reading>> {
        let file = std::fs::File::open(&source.path).map_err(|e| CompareError::FileRead {
            path: source.path.clone(),
            source: e,
        })?;
        Self::parse_reader(&source.label, file)
    }

    /// Parse CSV data from any reader, keeping only rows with a valid
    /// timestamp.
    pub fn parse_reader<R: Read>(label: &str, reader: R) -> Result<Vec<Reading>> {
        let raw = Self::parse_raw(label, reader)?;
        let rows_read = raw.len();

        let readings: Vec<Reading> = raw.into_iter().filter_map(RawRecord::into_reading).collect();

        debug!(
            "Dataset {}: {} rows read, {} without a valid timestamp, {} retained",
            label,
            rows_read,
            rows_read - readings.len(),
            readings.len(),
        );

        Ok(readings)
    }

    /// Parse every row into a [`RawRecord`] without filtering.
    ///
    /// Fails only when the header cannot be read or lacks a required
    /// column. Rows the CSV reader cannot decode are skipped.
    pub fn parse_raw<R: Read>(label: &str, reader: R) -> Result<Vec<RawRecord>> {
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let columns = ColumnIndex::resolve(label, &headers)?;

        let mut records = Vec::new();
        let mut undecodable = 0usize;

        for result in csv_reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    undecodable += 1;
                    debug!("Dataset {}: skipping undecodable row: {}", label, e);
                    continue;
                }
            };
            records.push(Self::to_raw_record(&record, columns));
        }

        if undecodable > 0 {
            debug!("Dataset {}: {} undecodable row(s) skipped", label, undecodable);
        }

        Ok(records)
    }

    fn to_raw_record(record: &StringRecord, columns: ColumnIndex) -> RawRecord {
        RawRecord {
            timestamp: record
                .get(columns.timestamp)
                .and_then(TimestampParser::parse),
            temperature: parse_measurement(record.get(columns.temperature)),
            humidity: parse_measurement(record.get(columns.humidity)),
        }
    }
}

/// Parse a numeric cell; empty, absent or non-numeric cells become `NaN`.
fn parse_measurement(cell: Option<&str>) -> f64 {
    cell.map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
