//! Model artifact: the single document handed from training to inference.
//!
//! The artifact carries everything an independent consumer needs to score
//! new telemetry: feature ordering, standardization parameters, and both
//! linear heads. It is versioned ([`SCHEMA_VERSION`]) and carries a SHA-256
//! digest over the numeric sections so truncated or hand-edited files are
//! rejected on load.

pub mod artifact;
pub mod error;
pub mod reader;
pub mod writer;

pub use artifact::{
    artifact_json_schema, linear_score, ArtifactMeta, ArtifactMetrics, ClassifierHead, Integrity,
    ModelArtifact, ModelBrief, RegressionHead, Snapshot, Standardization, DIGEST_ALGORITHM,
};
pub use error::{BundleError, Result};
pub use iaq_common::schema::SCHEMA_VERSION;
pub use reader::{parse_artifact, read_artifact};
pub use writer::write_artifact;
