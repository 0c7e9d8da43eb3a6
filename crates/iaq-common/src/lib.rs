//! IAQ forecast common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the training pipeline:
//! - Canonical telemetry and feature row types
//! - The fixed feature ordering shared with inference consumers
//! - Run identifiers and schema versioning
//! - The unified error type

pub mod error;
pub mod features;
pub mod id;
pub mod output;
pub mod row;
pub mod schema;

pub use error::{Error, Result};
pub use features::{FeatureVector, FEATURE_NAMES, N_FEATURES};
pub use id::RunId;
pub use output::OutputFormat;
pub use row::TelemetryRow;
pub use schema::SCHEMA_VERSION;
