//! Linear model fitters.
//!
//! Both fitters operate on standardized features and are deterministic: the
//! ridge solve is closed-form and the logistic optimizer starts from zero.

pub mod logistic;
pub mod ridge;

use iaq_common::{FeatureVector, N_FEATURES};
use thiserror::Error;

pub use logistic::{fit_logistic, LogisticFit, LogisticParams};
pub use ridge::fit_ridge;

/// Errors from model fitting.
#[derive(Debug, Error)]
pub enum FitError {
    #[error("no training rows")]
    Empty,

    #[error("feature/target length mismatch: {features} rows vs {targets} targets")]
    LengthMismatch { features: usize, targets: usize },

    #[error("training labels contain a single class ({positives} of {total} hazardous)")]
    SingleClass { positives: usize, total: usize },

    #[error("{model}: {detail}")]
    Numerical { model: &'static str, detail: String },
}

impl From<FitError> for iaq_common::Error {
    fn from(err: FitError) -> Self {
        match err {
            FitError::SingleClass { .. } => iaq_common::Error::DegenerateLabels(err.to_string()),
            FitError::Empty => iaq_common::Error::InsufficientData {
                required: 1,
                actual: 0,
            },
            FitError::LengthMismatch { .. } | FitError::Numerical { .. } => {
                iaq_common::Error::NumericalInstability(err.to_string())
            }
        }
    }
}

/// Coefficients plus intercept over the standardized feature space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearModel {
    pub coef: FeatureVector,
    pub intercept: f64,
}

impl LinearModel {
    pub fn zeros() -> Self {
        Self {
            coef: [0.0; N_FEATURES],
            intercept: 0.0,
        }
    }

    /// `intercept + coef · z`.
    pub fn score(&self, z: &FeatureVector) -> f64 {
        iaq_bundle::linear_score(&self.coef, self.intercept, z)
    }

    fn is_finite(&self) -> bool {
        self.intercept.is_finite() && self.coef.iter().all(|c| c.is_finite())
    }
}

fn check_lengths(x: &[FeatureVector], n_targets: usize) -> Result<(), FitError> {
    if x.is_empty() {
        return Err(FitError::Empty);
    }
    if x.len() != n_targets {
        return Err(FitError::LengthMismatch {
            features: x.len(),
            targets: n_targets,
        });
    }
    Ok(())
}
