//! Canonical telemetry row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One normalized telemetry observation.
///
/// `iaq` is always present and finite; the remaining readings are `None`
/// when the source value was absent, non-numeric, or non-finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRow {
    #[serde(rename = "createdAt")]
    pub timestamp: DateTime<Utc>,
    pub iaq: f64,
    #[serde(rename = "gasK")]
    pub gas_k: Option<f64>,
    pub temp: Option<f64>,
    pub hum: Option<f64>,
    pub pres: Option<f64>,
}

impl TelemetryRow {
    /// Row with every reading present.
    pub fn complete(
        timestamp: DateTime<Utc>,
        iaq: f64,
        gas_k: f64,
        temp: f64,
        hum: f64,
        pres: f64,
    ) -> Self {
        Self {
            timestamp,
            iaq,
            gas_k: Some(gas_k),
            temp: Some(temp),
            hum: Some(hum),
            pres: Some(pres),
        }
    }

    /// Readings as floats, with missing values mapped to NaN for column math.
    pub fn readings(&self) -> [f64; 5] {
        let nan = f64::NAN;
        [
            self.iaq,
            self.gas_k.unwrap_or(nan),
            self.temp.unwrap_or(nan),
            self.hum.unwrap_or(nan),
            self.pres.unwrap_or(nan),
        ]
    }
}
