//! Artifact schema (wire contract v1).
//!
//! Compatibility rules:
//! - Adding an optional field is a MINOR bump; readers ignore unknown fields.
//! - Changing `meta.features` (set or order), removing a field, or changing a
//!   field's type is a MAJOR bump; readers reject other major versions.

use chrono::{DateTime, Utc};
use iaq_common::features::matches_feature_order;
use iaq_common::schema::{is_compatible, SCHEMA_VERSION};
use iaq_common::{FeatureVector, RunId, N_FEATURES};
use iaq_math::sigmoid;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BundleError, Result};

pub const DIGEST_ALGORITHM: &str = "sha256";

/// The complete training output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelArtifact {
    pub schema_version: String,
    pub meta: ArtifactMeta,
    pub metrics: ArtifactMetrics,
    pub model_brief: ModelBrief,
    pub standardization: Standardization,
    pub regression: RegressionHead,
    pub classifier: ClassifierHead,
    /// Most recent raw observation seen during training.
    pub snapshot: Snapshot,
    pub integrity: Integrity,
}

/// Configuration the models were trained under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactMeta {
    pub run_id: RunId,
    pub horizon_steps: usize,
    pub hazard_threshold: f64,
    pub rolling_window: usize,
    pub sample_interval_sec: u32,
    pub test_fraction: f64,
    /// Feature names in coefficient order.
    pub features: Vec<String>,
    pub trained_at: DateTime<Utc>,
}

/// Held-out evaluation. `None` marks a metric that is undefined for the
/// test partition (empty, or single-class for AUC).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ArtifactMetrics {
    pub train_samples: usize,
    pub test_samples: usize,
    pub iaq_mae: Option<f64>,
    pub hazard_auc: Option<f64>,
    pub classifier_iterations: usize,
    pub classifier_converged: bool,
}

/// Human-readable description for dashboards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelBrief {
    pub name: String,
    pub input: String,
    pub output: String,
}

/// Per-feature affine transform: `(raw - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Standardization {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// Ridge regression head: `intercept + coef · z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegressionHead {
    #[serde(rename = "type")]
    pub kind: String,
    pub alpha: f64,
    pub coef: Vec<f64>,
    pub intercept: f64,
}

/// Logistic head: `P(hazard) = sigmoid(intercept + coef · z)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClassifierHead {
    #[serde(rename = "type")]
    pub kind: String,
    /// Inverse regularization strength.
    pub c: f64,
    /// `"balanced"` or `"none"`.
    pub class_weight: String,
    pub coef: Vec<f64>,
    pub intercept: f64,
    /// `classes[1]` is the label the probability refers to.
    pub classes: [u8; 2],
}

/// Latest raw observation, for sanity-checking inference pipelines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Snapshot {
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    pub iaq: Option<f64>,
    #[serde(rename = "gasK")]
    pub gas_k: Option<f64>,
    pub temp: Option<f64>,
    pub hum: Option<f64>,
    pub pres: Option<f64>,
}

/// Digest over the numeric model sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Integrity {
    pub algorithm: String,
    pub digest: String,
}

/// Linear score `intercept + Σ coef[j] * z[j]`.
pub fn linear_score(coef: &[f64], intercept: f64, z: &[f64]) -> f64 {
    intercept + coef.iter().zip(z).map(|(c, x)| c * x).sum::<f64>()
}

impl RegressionHead {
    /// Forecast from a standardized feature vector.
    pub fn score(&self, z: &[f64]) -> f64 {
        linear_score(&self.coef, self.intercept, z)
    }
}

impl ClassifierHead {
    /// Linear score (log-odds of hazard) from a standardized feature vector.
    pub fn score(&self, z: &[f64]) -> f64 {
        linear_score(&self.coef, self.intercept, z)
    }

    pub fn probability(&self, z: &[f64]) -> f64 {
        sigmoid(self.score(z))
    }
}

impl ModelArtifact {
    /// Assemble, stamp the digest, and validate.
    pub fn assemble(
        meta: ArtifactMeta,
        metrics: ArtifactMetrics,
        model_brief: ModelBrief,
        standardization: Standardization,
        regression: RegressionHead,
        classifier: ClassifierHead,
        snapshot: Snapshot,
    ) -> Result<Self> {
        let digest = compute_digest(&standardization, &regression, &classifier)?;
        let artifact = Self {
            schema_version: SCHEMA_VERSION.to_string(),
            meta,
            metrics,
            model_brief,
            standardization,
            regression,
            classifier,
            snapshot,
            integrity: Integrity {
                algorithm: DIGEST_ALGORITHM.to_string(),
                digest,
            },
        };
        artifact.validate()?;
        Ok(artifact)
    }

    /// Check version, digest, and structural invariants.
    pub fn validate(&self) -> Result<()> {
        if !is_compatible(&self.schema_version) {
            return Err(BundleError::UnsupportedVersion {
                version: self.schema_version.clone(),
                supported: SCHEMA_VERSION.to_string(),
            });
        }
        if !matches_feature_order(&self.meta.features) {
            return Err(BundleError::Invalid(format!(
                "meta.features does not match the {N_FEATURES}-feature training order"
            )));
        }
        check_vector("standardization.mean", &self.standardization.mean)?;
        check_vector("standardization.scale", &self.standardization.scale)?;
        if self.standardization.scale.iter().any(|s| *s <= 0.0) {
            return Err(BundleError::Invalid(
                "standardization.scale must be strictly positive".into(),
            ));
        }
        check_vector("regression.coef", &self.regression.coef)?;
        check_vector("classifier.coef", &self.classifier.coef)?;
        if !self.regression.intercept.is_finite() || !self.classifier.intercept.is_finite() {
            return Err(BundleError::Invalid("intercepts must be finite".into()));
        }
        if self.classifier.classes != [0, 1] {
            return Err(BundleError::Invalid("classifier.classes must be [0, 1]".into()));
        }
        if let Some(auc) = self.metrics.hazard_auc {
            if !(0.0..=1.0).contains(&auc) {
                return Err(BundleError::Invalid(format!("hazard_auc {auc} outside [0, 1]")));
            }
        }
        if self.integrity.algorithm != DIGEST_ALGORITHM {
            return Err(BundleError::Invalid(format!(
                "unsupported digest algorithm {}",
                self.integrity.algorithm
            )));
        }
        let actual = compute_digest(&self.standardization, &self.regression, &self.classifier)?;
        if actual != self.integrity.digest {
            return Err(BundleError::DigestMismatch {
                expected: self.integrity.digest.clone(),
                actual,
            });
        }
        Ok(())
    }

    /// Apply the stored standardization to a raw feature vector.
    pub fn standardize(&self, raw: &FeatureVector) -> FeatureVector {
        let mut z = [0.0; N_FEATURES];
        for (j, out) in z.iter_mut().enumerate() {
            *out = (raw[j] - self.standardization.mean[j]) / self.standardization.scale[j];
        }
        z
    }

    /// Forecast IAQ `horizon_steps` ahead from a raw feature vector.
    pub fn predict_iaq(&self, raw: &FeatureVector) -> f64 {
        self.regression.score(&self.standardize(raw))
    }

    /// Probability that IAQ reaches the hazard threshold within the horizon.
    pub fn hazard_probability(&self, raw: &FeatureVector) -> f64 {
        self.classifier.probability(&self.standardize(raw))
    }
}

fn check_vector(name: &str, v: &[f64]) -> Result<()> {
    if v.len() != N_FEATURES {
        return Err(BundleError::Invalid(format!(
            "{name} has {} entries, expected {N_FEATURES}",
            v.len()
        )));
    }
    if v.iter().any(|x| !x.is_finite()) {
        return Err(BundleError::Invalid(format!("{name} contains non-finite values")));
    }
    Ok(())
}

fn compute_digest(
    standardization: &Standardization,
    regression: &RegressionHead,
    classifier: &ClassifierHead,
) -> Result<String> {
    let canonical = serde_json::to_vec(&(standardization, regression, classifier))?;
    Ok(hex::encode(Sha256::digest(&canonical)))
}

/// JSON Schema describing [`ModelArtifact`].
pub fn artifact_json_schema() -> serde_json::Value {
    serde_json::to_value(schemars::schema_for!(ModelArtifact)).unwrap_or(serde_json::Value::Null)
}
