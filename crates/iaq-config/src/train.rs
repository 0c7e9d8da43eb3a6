//! Training run configuration.

use serde::{Deserialize, Serialize};

use crate::source::SourceConfig;
use crate::validate::ValidationError;

/// Everything a training run needs besides the rows themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Steps ahead the regression target and hazard label look (≥ 1).
    pub horizon_steps: usize,
    /// Trailing window for rolling statistics (≥ 2, sample std needs two points).
    pub rolling_window: usize,
    /// IAQ at or above this value is a hazard.
    pub hazard_threshold: f64,
    /// Nominal seconds between samples. Only used for the model description.
    pub sample_interval_sec: u32,
    /// Fraction of supervised rows held out at the end of the timeline, in `[0, 1)`.
    pub test_fraction: f64,
    /// Extra rows required beyond `rolling_window + horizon_steps` before training.
    pub min_margin_rows: usize,
    /// Ridge regularization strength (≥ 0).
    pub ridge_alpha: f64,
    pub logistic: LogisticConfig,
    /// Accepted IAQ range; readings outside are treated as sensor faults.
    pub iaq_range: IaqRange,
    pub source: SourceConfig,
    /// Where the artifact is written.
    pub model_path: String,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            horizon_steps: 40,
            rolling_window: 10,
            hazard_threshold: 200.0,
            sample_interval_sec: 3,
            test_fraction: 0.2,
            min_margin_rows: 50,
            ridge_alpha: 1.0,
            logistic: LogisticConfig::default(),
            iaq_range: IaqRange::default(),
            source: SourceConfig::default(),
            model_path: "ai/model.json".to_string(),
        }
    }
}

impl TrainConfig {
    /// Rows needed before the pipeline will attempt a fit.
    pub fn min_rows(&self) -> usize {
        self.rolling_window + self.horizon_steps + self.min_margin_rows
    }

    /// Forecast lead time described in the artifact.
    pub fn horizon_seconds(&self) -> u64 {
        self.horizon_steps as u64 * u64::from(self.sample_interval_sec)
    }

    /// Collect every semantic violation.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.horizon_steps == 0 {
            errors.push(ValidationError::new("horizon_steps", "must be a positive integer"));
        }
        if self.rolling_window < 2 {
            errors.push(ValidationError::new("rolling_window", "must be at least 2"));
        }
        if !self.hazard_threshold.is_finite() {
            errors.push(ValidationError::new("hazard_threshold", "must be finite"));
        }
        if self.sample_interval_sec == 0 {
            errors.push(ValidationError::new("sample_interval_sec", "must be at least 1"));
        }
        if !(0.0..1.0).contains(&self.test_fraction) {
            errors.push(ValidationError::new("test_fraction", "must be in [0, 1)"));
        }
        if !(self.ridge_alpha >= 0.0 && self.ridge_alpha.is_finite()) {
            errors.push(ValidationError::new("ridge_alpha", "must be finite and non-negative"));
        }
        errors.extend(self.logistic.validate());
        errors.extend(self.iaq_range.validate());
        errors.extend(self.source.validate());
        if self.model_path.trim().is_empty() {
            errors.push(ValidationError::new("model_path", "must not be empty"));
        }
        errors
    }
}

/// Logistic classifier optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    /// Inverse regularization strength.
    pub c: f64,
    pub max_iter: usize,
    /// Convergence tolerance on the gradient max-norm.
    pub tol: f64,
    /// Weight classes inversely to their frequency.
    pub balanced: bool,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 2000,
            tol: 1e-4,
            balanced: true,
        }
    }
}

impl LogisticConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !(self.c > 0.0 && self.c.is_finite()) {
            errors.push(ValidationError::new("logistic.c", "must be finite and positive"));
        }
        if self.max_iter == 0 {
            errors.push(ValidationError::new("logistic.max_iter", "must be at least 1"));
        }
        if !(self.tol > 0.0 && self.tol.is_finite()) {
            errors.push(ValidationError::new("logistic.tol", "must be finite and positive"));
        }
        errors
    }
}

/// Inclusive physical range for IAQ readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IaqRange {
    pub min: f64,
    pub max: f64,
}

impl Default for IaqRange {
    fn default() -> Self {
        Self { min: 0.0, max: 600.0 }
    }
}

impl IaqRange {
    pub fn contains(&self, iaq: f64) -> bool {
        iaq >= self.min && iaq <= self.max
    }

    fn validate(&self) -> Vec<ValidationError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Vec::new()
        } else {
            vec![ValidationError::new("iaq_range", "min and max must be finite with min <= max")]
        }
    }
}
