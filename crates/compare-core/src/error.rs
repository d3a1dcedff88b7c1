use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sensor comparison engine.
#[derive(Error, Debug)]
pub enum CompareError {
    /// A dataset is missing one or more of the required columns.
    #[error("Dataset {label} is missing required column(s): {}", .missing.join(", "))]
    Schema { label: String, missing: Vec<String> },

    /// No dataset in the batch produced a single aggregated row.
    #[error("No valid data: no dataset produced any daily summaries")]
    EmptyResult,

    /// A file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed on the header or while writing output.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// No CSV files were found under the given path.
    #[error("No CSV files found in {0}")]
    NoDataFiles(PathBuf),

    /// A JSON document could not be produced or parsed.
    #[error("Failed to process JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CompareError {
    /// Build a [`CompareError::Schema`] from the dataset label and the
    /// missing column names.
    pub fn schema<S: AsRef<str>>(label: impl Into<String>, missing: &[S]) -> Self {
        CompareError::Schema {
            label: label.into(),
            missing: missing.iter().map(|m| m.as_ref().to_string()).collect(),
        }
    }

    /// `true` for errors scoped to a single dataset, which the batch
    /// pipeline downgrades to a warning.
    pub fn is_per_dataset(&self) -> bool {
        matches!(
            self,
            CompareError::Schema { .. } | CompareError::FileRead { .. } | CompareError::Csv(_)
        )
    }
}

/// Convenience alias used throughout the comparison crates.
pub type Result<T> = std::result::Result<T, CompareError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_schema_single_column() {
        let err = CompareError::schema("sensorA", &["humidity"]);
        assert_eq!(
            err.to_string(),
            "Dataset sensorA is missing required column(s): humidity"
        );
    }

    #[test]
    fn test_error_display_schema_lists_every_column() {
        let err = CompareError::schema("b", &["temperature", "humidity"]);
        let msg = err.to_string();
        assert!(msg.contains("temperature, humidity"));
        assert!(msg.contains("Dataset b"));
    }

    #[test]
    fn test_error_display_empty_result() {
        let err = CompareError::EmptyResult;
        assert!(err.to_string().starts_with("No valid data"));
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CompareError::FileRead {
            path: PathBuf::from("/some/sensor.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/sensor.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_no_data_files() {
        let err = CompareError::NoDataFiles(PathBuf::from("/empty/dir"));
        assert_eq!(err.to_string(), "No CSV files found in /empty/dir");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: CompareError = io_err.into();
        assert!(err.to_string().contains("denied"));
        assert!(!err.is_per_dataset());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: CompareError = json_err.into();
        assert!(err.to_string().contains("Failed to process JSON"));
    }

    #[test]
    fn test_per_dataset_classification() {
        assert!(CompareError::schema("a", &["humidity"]).is_per_dataset());
        assert!(!CompareError::EmptyResult.is_per_dataset());
        assert!(!CompareError::NoDataFiles(PathBuf::from("logs")).is_per_dataset());
    }
}
