//! Error types for artifact operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building, writing, or reading an artifact.
#[derive(Error, Debug)]
pub enum BundleError {
    /// I/O error
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown or unsupported artifact version
    #[error("unsupported artifact version: {version} (supported: {supported})")]
    UnsupportedVersion { version: String, supported: String },

    /// Digest over the model sections does not match
    #[error("integrity digest mismatch: expected {expected}, got {actual}")]
    DigestMismatch { expected: String, actual: String },

    /// Structural invariant violated (lengths, ordering, non-finite values)
    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Result type alias for artifact operations.
pub type Result<T> = std::result::Result<T, BundleError>;

impl From<BundleError> for iaq_common::Error {
    fn from(err: BundleError) -> Self {
        match err {
            BundleError::Io { source, .. } => iaq_common::Error::Io(source),
            other => iaq_common::Error::InvalidArtifact(other.to_string()),
        }
    }
}
