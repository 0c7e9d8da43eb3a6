//! IAQ forecast trainer core.
//!
//! Turns chronological air-quality telemetry into a versioned model artifact
//! holding a ridge forecaster for IAQ `horizon_steps` ahead and a balanced
//! logistic classifier for threshold crossings.

pub mod dataset;
pub mod evaluate;
pub mod exit_codes;
pub mod features;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod standardize;

pub use dataset::{chronological_split, make_supervised, SupervisedRow};
pub use evaluate::{mean_absolute_error, roc_auc};
pub use exit_codes::ExitCode;
pub use features::{build_features, FeatureRow};
pub use model::{fit_logistic, fit_ridge, FitError, LinearModel, LogisticFit, LogisticParams};
pub use pipeline::{run, run_with_source, train, HoldoutPrediction, StageCounts, TrainOutcome};
pub use standardize::Standardizer;
