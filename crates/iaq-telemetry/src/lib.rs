//! IAQ telemetry ingestion.
//!
//! This crate provides:
//! - Raw record shapes shared by every source
//! - The row normalizer (pure, best-effort, reports skip counts)
//! - The [`TelemetrySource`] capability with SQLite store, dump file, and
//!   block-log implementations

pub mod block_log;
pub mod dump;
pub mod error;
pub mod normalize;
pub mod raw;
pub mod source;
pub mod store;
pub mod timestamp;

pub use block_log::{parse_block_log, write_dump, BlockLog, LogEntry, BLOCK_DELIMITER};
pub use dump::DumpFile;
pub use error::SourceError;
pub use normalize::{normalize, normalize_record, NormalizeReport, SkipReason};
pub use raw::{RawRecord, RawTimestamp, RawValue};
pub use source::{open_source, MemorySource, TelemetrySource};
pub use store::SqliteStore;
