//! Synthetic telemetry shared by the integration tests.

#![allow(dead_code)]

use std::f64::consts::PI;
use std::path::Path;

use chrono::{DateTime, Duration, TimeZone, Utc};
use iaq_common::TelemetryRow;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 12, 20, 12, 0, 0).unwrap()
}

/// `n` rows at 3-second spacing with IAQ from `iaq(i)` and slowly varying
/// companion readings.
pub fn series(n: usize, iaq: impl Fn(usize) -> f64) -> Vec<TelemetryRow> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            TelemetryRow::complete(
                t0() + Duration::seconds(3 * i as i64),
                iaq(i),
                150.0 - 0.3 * x + 4.0 * (x / 7.0).sin(),
                21.0 + 0.5 * (x / 11.0).cos(),
                45.0 + 3.0 * (x / 13.0).sin(),
                1013.0 + 0.2 * (x / 5.0).cos(),
            )
        })
        .collect()
}

/// 200 rows with IAQ ramping linearly from 50 to 250.
pub fn ramp() -> Vec<TelemetryRow> {
    series(200, |i| 50.0 + 200.0 * i as f64 / 199.0)
}

/// IAQ oscillating around 150 with amplitude 80 and a 40-sample period, so
/// both hazard classes recur throughout the series.
pub fn oscillating(n: usize) -> Vec<TelemetryRow> {
    series(n, |i| 150.0 + 80.0 * (2.0 * PI * i as f64 / 40.0).sin())
}

/// Write rows as a CSV dump readable by the dump source.
pub fn write_csv(rows: &[TelemetryRow], path: &Path) {
    let mut out = String::from("createdAt,iaq,gasK,temp,hum,pres\n");
    for r in rows {
        out.push_str(&format!(
            "{},{},{},{},{},{}\n",
            r.timestamp.to_rfc3339(),
            r.iaq,
            r.gas_k.unwrap(),
            r.temp.unwrap(),
            r.hum.unwrap(),
            r.pres.unwrap()
        ));
    }
    std::fs::write(path, out).unwrap();
}
