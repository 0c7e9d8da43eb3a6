//! Artifact loading with version and integrity checks.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::artifact::ModelArtifact;
use crate::error::{BundleError, Result};

/// Read and verify an artifact from disk.
pub fn read_artifact(path: &Path) -> Result<ModelArtifact> {
    let text = fs::read_to_string(path).map_err(|source| BundleError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let artifact = parse_artifact(&text)?;
    debug!(
        target: "bundle.read",
        path = %path.display(),
        schema_version = %artifact.schema_version,
        run_id = %artifact.meta.run_id,
        "model artifact loaded"
    );
    Ok(artifact)
}

/// Parse and verify an artifact document.
pub fn parse_artifact(text: &str) -> Result<ModelArtifact> {
    let artifact: ModelArtifact = serde_json::from_str(text)?;
    artifact.validate()?;
    Ok(artifact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::tests::sample_artifact;
    use crate::writer::write_artifact;

    #[test]
    fn round_trip_preserves_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        let original = sample_artifact();
        write_artifact(&original, &path).unwrap();
        assert_eq!(read_artifact(&path).unwrap(), original);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_artifact(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, BundleError::Io { .. }));
    }

    #[test]
    fn hand_edited_digest_rejected() {
        let mut json = serde_json::to_value(sample_artifact()).unwrap();
        json["regression"]["intercept"] = serde_json::json!(0.0);
        let err = parse_artifact(&json.to_string()).unwrap_err();
        assert!(matches!(err, BundleError::DigestMismatch { .. }));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut json = serde_json::to_value(sample_artifact()).unwrap();
        json["extra"] = serde_json::json!({"note": "added by a newer minor"});
        assert!(parse_artifact(&json.to_string()).is_ok());
    }
}
