//! Error types for alarm-eval
//!
//! Schema problems abort the load step; nothing else is an error. Ratios with a
//! zero denominator are reported as absent values in the output rows (see
//! [`crate::metric`]), never raised.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// alarm-eval error types
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or inconsistent input table
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Engine configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Storage error (Parquet/file access)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Input table violations detected while loading a [`crate::storage::RecordStore`].
///
/// Any of these fails the whole load; there is no partial store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The same rule fired twice for the same subject
    #[error("Schema error: duplicate trigger for subject `{subject_id}` under alarm `{alarm_type}`")]
    DuplicateTrigger {
        /// Offending subject
        subject_id: String,
        /// Alarm type that appears twice
        alarm_type: String,
    },

    /// Ground-truth label differs between rows of one subject
    #[error("Schema error: inconsistent label for subject `{subject_id}` (saw {first}, then {conflicting})")]
    InconsistentLabel {
        /// Offending subject
        subject_id: String,
        /// Label seen first
        first: bool,
        /// Label that contradicts it
        conflicting: bool,
    },

    /// A required value is null or empty
    #[error("Schema error: missing required field `{field}` at row {row}")]
    MissingField {
        /// Zero-based row index in load order
        row: usize,
        /// Field name
        field: &'static str,
    },

    /// A required column is absent from an Arrow batch
    #[error("Schema error: missing required column `{column}`")]
    MissingColumn {
        /// Column name
        column: &'static str,
    },

    /// A required column has a type the loader cannot read
    #[error("Schema error: column `{column}` has unsupported type {data_type}")]
    UnsupportedColumnType {
        /// Column name
        column: &'static str,
        /// Arrow data type, rendered
        data_type: String,
    },
}
