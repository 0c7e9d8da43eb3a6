//! The telemetry source capability.

use iaq_common::TelemetryRow;
use iaq_config::{IaqRange, SourceConfig};
use tracing::{debug, info};

use crate::block_log::BlockLog;
use crate::dump::DumpFile;
use crate::error::SourceError;
use crate::normalize::normalize;
use crate::raw::RawRecord;
use crate::store::SqliteStore;

/// Anything that can produce telemetry for a training run.
///
/// Implementations only fetch raw records; normalization and the empty-result
/// check are shared through [`TelemetrySource::load`].
pub trait TelemetrySource {
    /// Human-readable identity for logs and error messages.
    fn describe(&self) -> String;

    /// Fetch raw records. Order does not matter.
    fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError>;

    /// Fetch, normalize, and sort. Fails with `NoData` when nothing survives.
    fn load(&self, range: &IaqRange) -> Result<Vec<TelemetryRow>, SourceError> {
        let raw = self.fetch_raw()?;
        let fetched = raw.len();
        let (rows, report) = normalize(raw, range);
        debug!(
            target: "telemetry.normalize",
            bad_timestamp = report.bad_timestamp,
            missing_iaq = report.missing_iaq,
            iaq_out_of_range = report.iaq_out_of_range,
            "Normalization skip counts"
        );
        info!(
            target: "telemetry.load",
            source = %self.describe(),
            fetched,
            accepted = report.accepted,
            skipped = report.total_skipped(),
            "Loaded telemetry"
        );
        if rows.is_empty() {
            return Err(SourceError::NoData(format!(
                "{} yielded no usable rows ({} fetched, {} skipped)",
                self.describe(),
                fetched,
                report.total_skipped()
            )));
        }
        Ok(rows)
    }
}

/// Build the source a configuration selects.
pub fn open_source(config: &SourceConfig) -> Box<dyn TelemetrySource> {
    match config {
        SourceConfig::Store { path, table } => Box::new(SqliteStore::new(path, table)),
        SourceConfig::Dump { path } => Box::new(DumpFile::new(path)),
        SourceConfig::BlockLog { path } => Box::new(BlockLog::new(path)),
    }
}

/// In-memory records, for embedding callers and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    pub records: Vec<RawRecord>,
}

impl MemorySource {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

impl TelemetrySource for MemorySource {
    fn describe(&self) -> String {
        format!("memory ({} records)", self.records.len())
    }

    fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError> {
        Ok(self.records.clone())
    }
}
