//! Criterion benchmarks for the model fitters and the full training pipeline.
//!
//! Inputs are synthetic and deterministic so results are comparable across
//! machines and CI runs.

use std::f64::consts::PI;

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use iaq_common::{FeatureVector, TelemetryRow, N_FEATURES};
use iaq_config::TrainConfig;
use iaq_core::model::{fit_logistic, fit_ridge, LogisticParams};
use iaq_core::pipeline::train;

fn telemetry(n: usize) -> Vec<TelemetryRow> {
    let t0 = Utc.with_ymd_and_hms(2025, 12, 20, 0, 0, 0).unwrap();
    (0..n)
        .map(|i| {
            let x = i as f64;
            TelemetryRow::complete(
                t0 + Duration::seconds(3 * i as i64),
                150.0 + 80.0 * (2.0 * PI * x / 40.0).sin(),
                120.0 + 5.0 * (x / 7.0).sin(),
                21.0 + 0.5 * (x / 11.0).cos(),
                45.0 + 3.0 * (x / 13.0).sin(),
                1013.0 + 0.2 * (x / 5.0).cos(),
            )
        })
        .collect()
}

fn design(n: usize) -> (Vec<FeatureVector>, Vec<f64>, Vec<bool>) {
    let mut state: u64 = 42;
    let mut next = || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (state >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0
    };
    let x: Vec<FeatureVector> = (0..n)
        .map(|_| {
            let mut r = [0.0; N_FEATURES];
            r.iter_mut().for_each(|v| *v = next());
            r
        })
        .collect();
    let y: Vec<f64> = x.iter().map(|r| 3.0 * r[0] - r[5] + 0.5 * next()).collect();
    let labels: Vec<bool> = y.iter().map(|v| *v > 0.8).collect();
    (x, y, labels)
}

fn bench_fitters(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit");
    for &n in &[1_000usize, 10_000] {
        let (x, y, labels) = design(n);
        group.bench_with_input(BenchmarkId::new("ridge", n), &n, |b, _| {
            b.iter(|| fit_ridge(black_box(&x), black_box(&y), 1.0).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("logistic", n), &n, |b, _| {
            b.iter(|| {
                fit_logistic(black_box(&x), black_box(&labels), &LogisticParams::default())
                    .unwrap()
            })
        });
    }
    group.finish();
}

fn bench_pipeline(c: &mut Criterion) {
    let rows = telemetry(5_000);
    let config = TrainConfig::default();
    c.bench_function("train_5k_rows", |b| {
        b.iter(|| train(black_box(&rows), &config).unwrap())
    });
}

criterion_group!(benches, bench_fitters, bench_pipeline);
criterion_main!(benches);
