//! Atomic artifact writer.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::artifact::ModelArtifact;
use crate::error::{BundleError, Result};

/// Validate and persist an artifact.
///
/// The document is written to a sibling `.tmp` file and renamed into place so
/// a crash never leaves a truncated artifact at `path`. Parent directories
/// are created as needed.
pub fn write_artifact(artifact: &ModelArtifact, path: &Path) -> Result<()> {
    artifact.validate()?;
    let body = serde_json::to_string_pretty(artifact)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| BundleError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, body.as_bytes()).map_err(|source| BundleError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        BundleError::Io {
            path: path.to_path_buf(),
            source,
        }
    })?;

    info!(
        target: "bundle.write",
        path = %path.display(),
        run_id = %artifact.meta.run_id,
        bytes = body.len(),
        digest = %artifact.integrity.digest,
        "model artifact written"
    );
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
