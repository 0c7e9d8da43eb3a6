//! Error types for telemetry sources.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while acquiring raw telemetry.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Source reachable but holds nothing usable (missing table, zero rows).
    #[error("no usable telemetry: {0}")]
    NoData(String),

    /// Source shape does not match what the trainer needs (missing columns).
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl From<SourceError> for iaq_common::Error {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::NoData(msg) => iaq_common::Error::NoData(msg),
            SourceError::Configuration(msg) => iaq_common::Error::Config(msg),
            other => iaq_common::Error::Source(other.to_string()),
        }
    }
}
