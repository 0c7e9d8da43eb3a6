//! Error types for the IAQ forecast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the training pipeline.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid model artifact: {0}")]
    InvalidArtifact(String),

    // Data errors (20-29)
    #[error("no usable telemetry: {0}")]
    NoData(String),

    #[error(
        "not enough data to train: need at least {required} rows, got {actual} \
         (rolling window + horizon + margin)"
    )]
    InsufficientData { required: usize, actual: usize },

    #[error("telemetry source failed: {0}")]
    Source(String),

    // Training errors (30-39)
    #[error("degenerate labels: {0}")]
    DegenerateLabels(String),

    #[error("numerical instability detected: {0}")]
    NumericalInstability(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    /// Used for detailed error reporting in JSON output.
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidArtifact(_) => 11,
            Error::NoData(_) => 20,
            Error::InsufficientData { .. } => 21,
            Error::Source(_) => 22,
            Error::DegenerateLabels(_) => 30,
            Error::NumericalInstability(_) => 31,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }
}
