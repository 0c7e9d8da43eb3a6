//! Feature builder: raw readings plus short-term trend and volatility.
//!
//! Derived columns are computed over the full chronological sequence and
//! rows with any non-finite value are dropped afterwards, so the warm-up
//! region (first `window - 1` rows) never reaches the models.

use chrono::{DateTime, Utc};
use iaq_common::{FeatureVector, TelemetryRow, N_FEATURES};
use iaq_math::{diff, rolling_mean, rolling_std};
use tracing::debug;

/// One fully-populated model input row.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureRow {
    pub timestamp: DateTime<Utc>,
    pub iaq: f64,
    /// Values in `FEATURE_NAMES` order.
    pub features: FeatureVector,
}

/// Build feature rows with trailing windows of `window` samples.
pub fn build_features(rows: &[TelemetryRow], window: usize) -> Vec<FeatureRow> {
    let column = |pick: fn(&TelemetryRow) -> f64| rows.iter().map(pick).collect::<Vec<f64>>();
    let iaq = column(|r| r.iaq);
    let gas = column(|r| r.gas_k.unwrap_or(f64::NAN));
    let pres = column(|r| r.pres.unwrap_or(f64::NAN));

    let iaq_d1 = diff(&iaq);
    let gas_d1 = diff(&gas);
    let pres_d1 = diff(&pres);
    let iaq_mean = rolling_mean(&iaq, window);
    let gas_mean = rolling_mean(&gas, window);
    let pres_mean = rolling_mean(&pres, window);
    let iaq_std = rolling_std(&iaq, window);
    let gas_std = rolling_std(&gas, window);

    let out: Vec<FeatureRow> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let [iaq_raw, gas_raw, temp, hum, pres_raw] = row.readings();
            let features: FeatureVector = [
                iaq_raw,
                gas_raw,
                temp,
                hum,
                pres_raw,
                iaq_d1[i],
                gas_d1[i],
                pres_d1[i],
                iaq_mean[i],
                gas_mean[i],
                pres_mean[i],
                iaq_std[i],
                gas_std[i],
            ];
            features.iter().all(|v| v.is_finite()).then(|| FeatureRow {
                timestamp: row.timestamp,
                iaq: row.iaq,
                features,
            })
        })
        .collect();

    debug!(
        target: "core.features",
        input = rows.len(),
        output = out.len(),
        window,
        n_features = N_FEATURES,
        "Built feature rows"
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn ramp(n: usize) -> Vec<TelemetryRow> {
        let t0 = Utc.with_ymd_and_hms(2025, 12, 20, 12, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let x = i as f64;
                TelemetryRow::complete(
                    t0 + Duration::seconds(3 * i as i64),
                    50.0 + x,
                    100.0 + 2.0 * x,
                    21.0,
                    40.0,
                    1013.0 - 0.1 * x,
                )
            })
            .collect()
    }

    #[test]
    fn warm_up_drops_window_minus_one_rows() {
        let rows = ramp(30);
        let feats = build_features(&rows, 10);
        assert_eq!(feats.len(), 21);
        assert_eq!(feats[0].timestamp, rows[9].timestamp);
    }

    #[test]
    fn derived_values_for_linear_ramp() {
        let feats = build_features(&ramp(12), 4);
        let f = &feats[0].features;
        // Row 3: iaq = 53, window 50..=53.
        assert_eq!(f[0], 53.0);
        assert_eq!(f[5], 1.0);
        assert_eq!(f[6], 2.0);
        assert!((f[7] + 0.1).abs() < 1e-9);
        assert_eq!(f[8], 51.5);
        assert_eq!(f[9], 103.0);
        let expected_std = (5.0f64 / 3.0).sqrt();
        assert!((f[11] - expected_std).abs() < 1e-12);
        assert!((f[12] - 2.0 * expected_std).abs() < 1e-12);
    }

    #[test]
    fn missing_reading_poisons_its_window() {
        let mut rows = ramp(30);
        rows[15].gas_k = None;
        let feats = build_features(&rows, 5);
        // Row 15 itself, its difference successor, and the 4 windows after it.
        for f in &feats {
            let idx = rows.iter().position(|r| r.timestamp == f.timestamp).unwrap();
            assert!(!(15..=19).contains(&idx), "row {idx} should be dropped");
        }
        assert_eq!(feats.len(), 26 - 5);
    }

    #[test]
    fn missing_temperature_drops_only_that_row() {
        let mut rows = ramp(20);
        rows[12].temp = None;
        assert_eq!(build_features(&rows, 3).len(), 18 - 1);
    }

    #[test]
    fn too_short_input_yields_nothing() {
        assert!(build_features(&ramp(5), 10).is_empty());
        assert!(build_features(&[], 10).is_empty());
    }
}
