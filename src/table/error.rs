use std::path::PathBuf;

use crate::schema::SchemaValidationError;

/// Errors that can occur while reading or writing internal tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// I/O error during file operations
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from the Arrow library during array operations
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Error from the Parquet library
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Error reading or writing CSV tables
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error serializing footer metadata
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Table schema lacks required columns
    #[error("Schema error: {0}")]
    SchemaError(#[from] SchemaValidationError),

    /// Column not found
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// Column has an unexpected Arrow type or value range
    #[error("Column '{column}' is not {expected}")]
    ColumnType {
        /// Column name
        column: String,
        /// Expected type
        expected: String,
    },

    /// Null in a required column
    #[error("Null value in required column '{column}' at row {row}")]
    NullValue {
        /// Column name
        column: String,
        /// 0-based row index
        row: usize,
    },

    /// File extension is neither parquet nor csv
    #[error("Unsupported table format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// No partition with the requested key
    #[error("Partition '{key}' not found in {}", .directory.display())]
    PartitionNotFound {
        /// Partition directory
        directory: PathBuf,
        /// Requested key
        key: String,
    },

    /// Different number of tables and partition keys
    #[error("Got {tables} tables for {keys} partition keys")]
    PartitionMismatch {
        /// Number of tables
        tables: usize,
        /// Number of keys
        keys: usize,
    },
}
