//! Training pipeline: rows → features → supervised set → split → scale →
//! fit → evaluate → artifact.
//!
//! Every stage consumes its whole input before the next starts. Nothing is
//! written until the artifact is fully assembled and validated, so a failed
//! run never leaves a partial file behind.

use std::path::Path;

use chrono::{DateTime, Utc};
use iaq_bundle::{
    write_artifact, ArtifactMeta, ArtifactMetrics, ClassifierHead, ModelArtifact, ModelBrief,
    RegressionHead, Snapshot,
};
use iaq_common::features::feature_names;
use iaq_common::{Error, FeatureVector, Result, RunId, TelemetryRow};
use iaq_config::TrainConfig;
use iaq_math::sigmoid;
use iaq_telemetry::{open_source, TelemetrySource};
use serde::Serialize;
use tracing::info;

use crate::dataset::{chronological_split, make_supervised, SupervisedRow};
use crate::evaluate::{mean_absolute_error, roc_auc};
use crate::features::build_features;
use crate::model::{fit_logistic, fit_ridge, LogisticParams};
use crate::standardize::Standardizer;

pub const MODEL_NAME: &str = "Ridge Regression + Logistic Hazard Classifier";
const MODEL_INPUT: &str = "Recent telemetry window (iaq, gasK, temp, hum, pres) + short-term trends";

/// Row counts at each stage, for summaries and logs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageCounts {
    pub telemetry_rows: usize,
    pub feature_rows: usize,
    pub supervised_rows: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub train_positives: usize,
    pub test_positives: usize,
}

/// Evaluator output for one test row.
#[derive(Debug, Clone, PartialEq)]
pub struct HoldoutPrediction {
    pub timestamp: DateTime<Utc>,
    /// Unstandardized features.
    pub features: FeatureVector,
    pub iaq_future: f64,
    pub hazard: bool,
    pub predicted_iaq: f64,
    pub hazard_probability: f64,
}

#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub artifact: ModelArtifact,
    pub counts: StageCounts,
    pub holdout: Vec<HoldoutPrediction>,
}

/// Train both models on chronologically ordered rows.
pub fn train(rows: &[TelemetryRow], config: &TrainConfig) -> Result<TrainOutcome> {
    let Some(latest) = rows.last() else {
        return Err(Error::NoData("no telemetry rows supplied".into()));
    };
    let required = config.min_rows();
    if rows.len() < required {
        return Err(Error::InsufficientData {
            required,
            actual: rows.len(),
        });
    }

    let features = build_features(rows, config.rolling_window);
    let supervised = make_supervised(&features, config.horizon_steps, config.hazard_threshold);
    let (train_rows, test_rows) = chronological_split(&supervised, config.test_fraction);
    let counts = StageCounts {
        telemetry_rows: rows.len(),
        feature_rows: features.len(),
        supervised_rows: supervised.len(),
        train_rows: train_rows.len(),
        test_rows: test_rows.len(),
        train_positives: positives(train_rows),
        test_positives: positives(test_rows),
    };
    info!(
        target: "core.pipeline",
        telemetry = counts.telemetry_rows,
        features = counts.feature_rows,
        supervised = counts.supervised_rows,
        train = counts.train_rows,
        test = counts.test_rows,
        "Prepared dataset"
    );
    if train_rows.is_empty() {
        // Gaps in optional readings can leave nothing after warm-up.
        return Err(Error::InsufficientData {
            required,
            actual: counts.supervised_rows,
        });
    }

    let raw_train: Vec<FeatureVector> = train_rows.iter().map(|r| r.features).collect();
    let scaler = Standardizer::fit(&raw_train).ok_or_else(|| Error::InsufficientData {
        required,
        actual: 0,
    })?;
    let z_train = scaler.apply_all(&raw_train);
    let iaq_future: Vec<f64> = train_rows.iter().map(|r| r.iaq_future).collect();
    let hazard: Vec<bool> = train_rows.iter().map(|r| r.hazard).collect();

    let ridge = fit_ridge(&z_train, &iaq_future, config.ridge_alpha)?;
    let params = LogisticParams {
        c: config.logistic.c,
        max_iter: config.logistic.max_iter,
        tol: config.logistic.tol,
        balanced: config.logistic.balanced,
    };
    let logistic = fit_logistic(&z_train, &hazard, &params)?;

    let holdout: Vec<HoldoutPrediction> = test_rows
        .iter()
        .map(|r| {
            let z = scaler.apply(&r.features);
            HoldoutPrediction {
                timestamp: r.timestamp,
                features: r.features,
                iaq_future: r.iaq_future,
                hazard: r.hazard,
                predicted_iaq: ridge.score(&z),
                hazard_probability: sigmoid(logistic.model.score(&z)),
            }
        })
        .collect();
    let predicted: Vec<f64> = holdout.iter().map(|h| h.predicted_iaq).collect();
    let actual: Vec<f64> = holdout.iter().map(|h| h.iaq_future).collect();
    let probabilities: Vec<f64> = holdout.iter().map(|h| h.hazard_probability).collect();
    let labels: Vec<bool> = holdout.iter().map(|h| h.hazard).collect();
    let iaq_mae = mean_absolute_error(&predicted, &actual);
    let hazard_auc = roc_auc(&probabilities, &labels);

    info!(
        target: "core.evaluate",
        test = holdout.len(),
        iaq_mae = ?iaq_mae,
        hazard_auc = ?hazard_auc,
        "Evaluated on held-out tail"
    );

    let artifact = ModelArtifact::assemble(
        ArtifactMeta {
            run_id: RunId::new(),
            horizon_steps: config.horizon_steps,
            hazard_threshold: config.hazard_threshold,
            rolling_window: config.rolling_window,
            sample_interval_sec: config.sample_interval_sec,
            test_fraction: config.test_fraction,
            features: feature_names(),
            trained_at: Utc::now(),
        },
        ArtifactMetrics {
            train_samples: train_rows.len(),
            test_samples: test_rows.len(),
            iaq_mae,
            hazard_auc,
            classifier_iterations: logistic.iterations,
            classifier_converged: logistic.converged,
        },
        ModelBrief {
            name: MODEL_NAME.to_string(),
            input: MODEL_INPUT.to_string(),
            output: format!(
                "IAQ forecast (~{}s ahead) + hazard probability (IAQ ≥ {})",
                config.horizon_seconds(),
                config.hazard_threshold
            ),
        },
        scaler.to_standardization(),
        RegressionHead {
            kind: "ridge".to_string(),
            alpha: config.ridge_alpha,
            coef: ridge.coef.to_vec(),
            intercept: ridge.intercept,
        },
        ClassifierHead {
            kind: "logistic".to_string(),
            c: config.logistic.c,
            class_weight: if config.logistic.balanced { "balanced" } else { "none" }.to_string(),
            coef: logistic.model.coef.to_vec(),
            intercept: logistic.model.intercept,
            classes: [0, 1],
        },
        snapshot(latest),
    )?;

    Ok(TrainOutcome {
        artifact,
        counts,
        holdout,
    })
}

/// Load from the configured source, train, and write the artifact.
pub fn run(config: &TrainConfig) -> Result<TrainOutcome> {
    let source = open_source(&config.source);
    run_with_source(source.as_ref(), config, Path::new(&config.model_path))
}

/// Same as [`run`] with an explicit source and destination.
pub fn run_with_source(
    source: &dyn TelemetrySource,
    config: &TrainConfig,
    model_path: &Path,
) -> Result<TrainOutcome> {
    let rows = source.load(&config.iaq_range)?;
    let outcome = train(&rows, config)?;
    write_artifact(&outcome.artifact, model_path)?;
    info!(
        target: "core.pipeline",
        path = %model_path.display(),
        run_id = %outcome.artifact.meta.run_id,
        "Training complete"
    );
    Ok(outcome)
}

fn positives(rows: &[SupervisedRow]) -> usize {
    rows.iter().filter(|r| r.hazard).count()
}

fn snapshot(row: &TelemetryRow) -> Snapshot {
    Snapshot {
        created_at: Some(row.timestamp),
        iaq: Some(row.iaq),
        gas_k: row.gas_k,
        temp: row.temp,
        hum: row.hum,
        pres: row.pres,
    }
}
