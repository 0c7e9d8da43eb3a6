//! Per-column standardization fit on the training partition only.

use iaq_bundle::Standardization;
use iaq_common::{FeatureVector, N_FEATURES};
use iaq_math::{mean, population_std};

/// Fitted `(x - mean) / scale` transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Standardizer {
    pub mean: FeatureVector,
    pub scale: FeatureVector,
}

impl Standardizer {
    /// Fit column means and population standard deviations.
    ///
    /// A column whose spread is negligible relative to its magnitude gets a
    /// scale of 1, so it standardizes to zeros instead of amplified noise.
    /// Returns `None` for an empty matrix.
    pub fn fit(rows: &[FeatureVector]) -> Option<Self> {
        if rows.is_empty() {
            return None;
        }
        let mut mu = [0.0; N_FEATURES];
        let mut scale = [1.0; N_FEATURES];
        let mut column = Vec::with_capacity(rows.len());
        for j in 0..N_FEATURES {
            column.clear();
            column.extend(rows.iter().map(|r| r[j]));
            mu[j] = mean(&column);
            let sd = population_std(&column);
            if sd.is_finite() && sd > 10.0 * f64::EPSILON * mu[j].abs().max(1.0) {
                scale[j] = sd;
            }
        }
        Some(Self { mean: mu, scale })
    }

    pub fn apply(&self, raw: &FeatureVector) -> FeatureVector {
        let mut z = [0.0; N_FEATURES];
        for (j, out) in z.iter_mut().enumerate() {
            *out = (raw[j] - self.mean[j]) / self.scale[j];
        }
        z
    }

    pub fn apply_all(&self, rows: &[FeatureVector]) -> Vec<FeatureVector> {
        rows.iter().map(|r| self.apply(r)).collect()
    }

    /// Artifact representation.
    pub fn to_standardization(&self) -> Standardization {
        Standardization {
            mean: self.mean.to_vec(),
            scale: self.scale.to_vec(),
        }
    }
}
