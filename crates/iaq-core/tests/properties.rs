//! Property-based tests for the dataset pipeline invariants.

mod common;

use chrono::Duration;
use iaq_common::features::feature_names;
use iaq_common::{FeatureVector, TelemetryRow, N_FEATURES};
use iaq_config::TrainConfig;
use iaq_core::dataset::{chronological_split, make_supervised};
use iaq_core::features::{build_features, FeatureRow};
use iaq_core::pipeline::train;
use iaq_core::standardize::Standardizer;
use proptest::prelude::*;

/// Rows with non-decreasing timestamps (gaps of 0..=10 s) and bounded IAQ.
fn arb_rows() -> impl Strategy<Value = Vec<TelemetryRow>> {
    prop::collection::vec((0i64..=10, 0.0f64..500.0, 50.0f64..300.0), 20..160).prop_map(|steps| {
        let mut ts = common::t0();
        steps
            .into_iter()
            .map(|(gap, iaq, gas)| {
                ts += Duration::seconds(gap);
                TelemetryRow::complete(ts, iaq, gas, 21.0, 45.0, 1013.0 + iaq / 1000.0)
            })
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn stages_preserve_chronology(
        rows in arb_rows(),
        window in 2usize..12,
        horizon in 1usize..20,
        fraction in 0.0f64..0.9,
    ) {
        let feats = build_features(&rows, window);
        prop_assert!(feats.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        prop_assert_eq!(feats.len(), rows.len().saturating_sub(window - 1));

        let sup = make_supervised(&feats, horizon, 200.0);
        prop_assert_eq!(sup.len(), feats.len().saturating_sub(horizon));
        prop_assert!(sup.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        let (train, test) = chronological_split(&sup, fraction);
        prop_assert_eq!(train.len() + test.len(), sup.len());
        prop_assert_eq!(test.len(), (sup.len() as f64 * fraction).floor() as usize);
        if let (Some(last_train), Some(first_test)) = (train.last(), test.first()) {
            prop_assert!(last_train.timestamp <= first_test.timestamp);
        }
    }

    #[test]
    fn horizon_target_is_exact_offset(n in 30usize..120, horizon in 1usize..15) {
        let rows = common::series(n, |i| i as f64);
        let feats = build_features(&rows, 3);
        let sup = make_supervised(&feats, horizon, 1e9);
        prop_assert_eq!(sup.len(), feats.len() - horizon);
        for (i, r) in sup.iter().enumerate() {
            prop_assert_eq!(r.iaq_future, feats[i].iaq + horizon as f64);
            prop_assert!(!r.hazard);
        }
    }

    #[test]
    fn artifact_dimensionality_is_fixed(window in 2usize..16, horizon in 1usize..40) {
        let config = TrainConfig {
            rolling_window: window,
            horizon_steps: horizon,
            hazard_threshold: 150.0,
            ..TrainConfig::default()
        };
        let outcome = train(&common::oscillating(260), &config).unwrap();
        let a = &outcome.artifact;
        prop_assert_eq!(a.standardization.mean.len(), N_FEATURES);
        prop_assert_eq!(a.standardization.scale.len(), N_FEATURES);
        prop_assert_eq!(a.regression.coef.len(), N_FEATURES);
        prop_assert_eq!(a.classifier.coef.len(), N_FEATURES);
        prop_assert_eq!(&a.meta.features, &feature_names());
        prop_assert!(a.standardization.scale.iter().all(|s| *s > 0.0));
    }
}

#[test]
fn horizon_five_on_unit_ramp() {
    let rows = common::series(60, |i| i as f64);
    let feats = build_features(&rows, 10);
    let sup = make_supervised(&feats, 5, 1e9);
    assert_eq!(sup.len(), feats.len() - 5);
    for (i, r) in sup.iter().enumerate() {
        assert_eq!(r.iaq_future, feats[i + 5].iaq);
        assert_eq!(r.iaq_future, feats[i].iaq + 5.0);
    }
    // The last five feature rows have no reachable future.
    let last_sup = sup.last().unwrap().timestamp;
    for f in &feats[feats.len() - 5..] {
        assert!(f.timestamp > last_sup);
    }
}

#[test]
fn hazard_threshold_is_inclusive() {
    let t0 = common::t0();
    let row = |i: i64, iaq: f64| FeatureRow {
        timestamp: t0 + Duration::seconds(i),
        iaq,
        features: [iaq; N_FEATURES],
    };
    let feats = vec![row(0, 10.0), row(1, 10.0), row(2, 199.999), row(3, 200.0)];
    let sup = make_supervised(&feats, 2, 200.0);
    assert_eq!(sup[0].iaq_future, 199.999);
    assert!(!sup[0].hazard);
    assert_eq!(sup[1].iaq_future, 200.0);
    assert!(sup[1].hazard);
}

#[test]
fn training_is_deterministic() {
    let rows = common::oscillating(240);
    let config = TrainConfig::default();
    let a = train(&rows, &config).unwrap().artifact;
    let b = train(&rows, &config).unwrap().artifact;
    assert_eq!(a.standardization, b.standardization);
    assert_eq!(a.regression, b.regression);
    assert_eq!(a.classifier, b.classifier);
    assert_eq!(a.metrics, b.metrics);
    assert_eq!(a.integrity.digest, b.integrity.digest);
    assert_ne!(a.meta.run_id, b.meta.run_id);
}

#[test]
fn standardization_uses_train_partition_only() {
    // A low, oscillating regime followed by a much higher one: the test tail
    // lives almost entirely in the second regime.
    let rows = common::series(300, |i| {
        let wave = 30.0 * (i as f64 / 6.0).sin();
        if i < 220 { 120.0 + wave } else { 400.0 + wave }
    });
    let config = TrainConfig {
        hazard_threshold: 140.0,
        ..TrainConfig::default()
    };
    let outcome = train(&rows, &config).unwrap();

    let feats = build_features(&rows, config.rolling_window);
    let sup = make_supervised(&feats, config.horizon_steps, config.hazard_threshold);
    let (train_part, _) = chronological_split(&sup, config.test_fraction);
    let raw: Vec<FeatureVector> = train_part.iter().map(|r| r.features).collect();
    let expected = Standardizer::fit(&raw).unwrap();

    let stored = &outcome.artifact.standardization;
    for j in 0..N_FEATURES {
        assert!((stored.mean[j] - expected.mean[j]).abs() < 1e-9);
        assert!((stored.scale[j] - expected.scale[j]).abs() < 1e-9);
    }
    let all: Vec<FeatureVector> = sup.iter().map(|r| r.features).collect();
    let full = Standardizer::fit(&all).unwrap();
    assert!((full.mean[0] - stored.mean[0]).abs() > 10.0);
}
