//! Supervised targets and the chronological train/test split.

use chrono::{DateTime, Utc};
use iaq_common::FeatureVector;
use tracing::debug;

use crate::features::FeatureRow;

/// A feature row paired with its future targets.
#[derive(Debug, Clone, PartialEq)]
pub struct SupervisedRow {
    pub timestamp: DateTime<Utc>,
    pub features: FeatureVector,
    /// IAQ `horizon` feature rows ahead.
    pub iaq_future: f64,
    /// `iaq_future >= threshold`.
    pub hazard: bool,
}

/// Attach the IAQ value `horizon` rows ahead; rows without one are dropped.
pub fn make_supervised(rows: &[FeatureRow], horizon: usize, threshold: f64) -> Vec<SupervisedRow> {
    if horizon == 0 || rows.len() <= horizon {
        return Vec::new();
    }
    let out: Vec<SupervisedRow> = rows
        .iter()
        .zip(&rows[horizon..])
        .filter(|(_, ahead)| ahead.iaq.is_finite())
        .map(|(row, ahead)| SupervisedRow {
            timestamp: row.timestamp,
            features: row.features,
            iaq_future: ahead.iaq,
            hazard: ahead.iaq >= threshold,
        })
        .collect();
    debug!(
        target: "core.dataset",
        input = rows.len(),
        output = out.len(),
        horizon,
        positives = out.iter().filter(|r| r.hazard).count(),
        "Built supervised rows"
    );
    out
}

/// Chronological split: the last `floor(n * test_fraction)` rows are test.
pub fn chronological_split(
    rows: &[SupervisedRow],
    test_fraction: f64,
) -> (&[SupervisedRow], &[SupervisedRow]) {
    let n_test = ((rows.len() as f64) * test_fraction).floor() as usize;
    rows.split_at(rows.len() - n_test.min(rows.len()))
}
