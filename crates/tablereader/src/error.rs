//! Error types for the tablereader library.

use std::path::PathBuf;
use thiserror::Error;

use crate::schema::ColumnType;

/// Main error type for table extraction.
#[derive(Debug, Error)]
pub enum TableReaderError {
    /// The requested file or sheet does not exist.
    #[error("Source not found: {0}")]
    SourceNotFound(String),

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimiter/quote conventions of a text source could not be inferred.
    #[error("Could not detect CSV dialect: {0}")]
    DialectDetectionFailed(String),

    /// No candidate format parses every sampled value of a temporal column.
    #[error("No {column_type} format matches every sampled value of column '{column}'")]
    NoFormatFound {
        column: String,
        column_type: ColumnType,
    },

    /// A non-null cell could not be converted to its column type.
    #[error("Parse error at row {row}, column '{column}' (value {value:?}): {message}")]
    ParseFailure {
        row: usize,
        column: String,
        value: String,
        message: String,
    },

    /// The header does not describe the extracted rectangle.
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// The table bounds violate their invariants.
    #[error("Invalid table spec: {0}")]
    InvalidTableSpec(String),

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error from the workbook library.
    #[error("Workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TableReaderError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            TableReaderError::SourceNotFound(path.display().to_string())
        } else {
            TableReaderError::Io { path, source }
        }
    }
}

/// Result type alias for tablereader operations.
pub type Result<T> = std::result::Result<T, TableReaderError>;
