use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AsosDataError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Data download failed")]
    DownloadIo(#[source] std::io::Error),

    #[error("Failed to read observation file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("Source '{0}' returned an empty payload")]
    EmptyPayload(String),

    // Errors during CSV reading (inside blocking task)
    #[error("I/O error processing CSV data from '{source_name}'")]
    CsvReadIo {
        source_name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error processing CSV data from '{source_name}'")]
    CsvReadPolars {
        source_name: String,
        #[source]
        source: PolarsError,
    },

    /// `row` is the zero-based data row, `None` for the header.
    #[error("CSV column count ({found}) does not match schema length ({expected}) for '{source_name}' (data row {row:?})")]
    SchemaMismatch {
        source_name: String,
        row: Option<usize>,
        expected: usize,
        found: usize,
    },

    #[error("Failed to rename columns for '{source_name}': {source}")]
    ColumnRenameError {
        source_name: String,
        source: PolarsError,
    },

    #[error("Row {row} of '{source_name}' has an invalid observation time {value:?}")]
    InvalidTimestamp {
        source_name: String,
        row: usize,
        value: Option<String>,
    },

    #[error("Required column '{0}' not found in DataFrame")]
    ColumnNotFound(String, #[source] PolarsError),

    #[error("Row {row} is missing required value '{column}'")]
    MissingValue { column: String, row: usize },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),
}
