//! Row normalizer: raw records → canonical chronological rows.
//!
//! Per-field failures never raise errors. A record either becomes a
//! [`TelemetryRow`] or is skipped with a [`SkipReason`]; callers get the
//! surviving rows plus counts of what was dropped and why.

use iaq_common::TelemetryRow;
use iaq_config::IaqRange;
use serde::Serialize;

use crate::raw::RawRecord;
use crate::timestamp;

/// Why a record did not survive normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Timestamp absent or unparseable.
    BadTimestamp,
    /// IAQ absent, non-numeric, or non-finite.
    MissingIaq,
    /// IAQ outside the accepted physical range.
    IaqOutOfRange,
}

/// Counts from one normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeReport {
    pub accepted: usize,
    pub bad_timestamp: usize,
    pub missing_iaq: usize,
    pub iaq_out_of_range: usize,
}

impl NormalizeReport {
    pub fn total_skipped(&self) -> usize {
        self.bad_timestamp + self.missing_iaq + self.iaq_out_of_range
    }

    fn record(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::BadTimestamp => self.bad_timestamp += 1,
            SkipReason::MissingIaq => self.missing_iaq += 1,
            SkipReason::IaqOutOfRange => self.iaq_out_of_range += 1,
        }
    }
}

/// Normalize one record.
pub fn normalize_record(raw: &RawRecord, range: &IaqRange) -> Result<TelemetryRow, SkipReason> {
    let timestamp = timestamp::resolve(&raw.timestamp).ok_or(SkipReason::BadTimestamp)?;
    let iaq = raw.iaq.coerce().ok_or(SkipReason::MissingIaq)?;
    if !range.contains(iaq) {
        return Err(SkipReason::IaqOutOfRange);
    }
    Ok(TelemetryRow {
        timestamp,
        iaq,
        gas_k: raw.gas_k.coerce(),
        temp: raw.temp.coerce(),
        hum: raw.hum.coerce(),
        pres: raw.pres.coerce(),
    })
}

/// Normalize a batch and sort ascending by timestamp.
///
/// The sort is stable, so records sharing a timestamp keep their source order.
/// Exact-timestamp collisions are not deduplicated.
pub fn normalize(
    records: impl IntoIterator<Item = RawRecord>,
    range: &IaqRange,
) -> (Vec<TelemetryRow>, NormalizeReport) {
    let mut report = NormalizeReport::default();
    let mut rows = Vec::new();
    for raw in records {
        match normalize_record(&raw, range) {
            Ok(row) => rows.push(row),
            Err(reason) => report.record(reason),
        }
    }
    rows.sort_by_key(|r| r.timestamp);
    report.accepted = rows.len();
    (rows, report)
}
