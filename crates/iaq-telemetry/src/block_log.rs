//! Free-text block logs written by the payload to its SD card.
//!
//! A log is a sequence of `key: value` blocks separated by a rule of forty
//! dashes:
//!
//! ```text
//! Date (LOCAL):    20/12/2025
//! Time (LOCAL):    11:29:17 PM
//! IAQ:             178.4
//! Gas (kΩ):        12.34
//! Temp (main, C):  25.12
//! Humidity (%):    55.1
//! Pressure (hPa):  1013.2
//! Latitude:        31.123456
//! Longitude:       29.987654
//! Altitude (m):    12.3
//! ----------------------------------------
//! ```
//!
//! Import is best-effort: blocks without a parseable date/time or without a
//! numeric IAQ are skipped, and a missing file yields no entries. Skip counts
//! are logged, never returned as errors.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SourceError;
use crate::raw::{RawRecord, RawTimestamp, RawValue};
use crate::source::TelemetrySource;
use crate::timestamp::parse_date_time;

/// Line separating two blocks.
pub const BLOCK_DELIMITER: &str = "----------------------------------------";

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Date\s*\(LOCAL\):\s*(.+)").expect("date regex"));
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Time\s*\(LOCAL\):\s*(.+)").expect("time regex"));
static IAQ_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"IAQ:\s*([-\d.]+)").expect("iaq regex"));
static GAS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Gas\s*\(kΩ\):\s*([-\d.]+)").expect("gas regex"));
static TEMP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Temp\s*\(main,\s*C\):\s*([-\d.]+)").expect("temp regex"));
static HUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Humidity\s*\(%\):\s*([-\d.]+)").expect("humidity regex"));
static PRES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Pressure\s*\(hPa\):\s*([-\d.]+)").expect("pressure regex"));
static LAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Latitude:\s*([-\d.]+)").expect("latitude regex"));
static LON_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Longitude:\s*([-\d.]+)").expect("longitude regex"));
static ALT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Altitude\s*\(m\):\s*([-\d.]+)").expect("altitude regex"));

/// One accepted block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub source: &'static str,
    #[serde(rename = "createdAt", serialize_with = "rfc3339_millis")]
    pub timestamp: DateTime<Utc>,
    pub date: String,
    pub time: String,
    pub iaq: f64,
    #[serde(rename = "gasK")]
    pub gas_k: Option<f64>,
    pub temp: Option<f64>,
    pub hum: Option<f64>,
    pub pres: Option<f64>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub alt: Option<f64>,
}

fn rfc3339_millis<S: serde::Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

impl LogEntry {
    fn to_raw(&self) -> RawRecord {
        RawRecord {
            timestamp: RawTimestamp::Instant(self.timestamp),
            iaq: RawValue::Number(self.iaq),
            gas_k: self.gas_k.into(),
            temp: self.temp.into(),
            hum: self.hum.into(),
            pres: self.pres.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockSkip {
    MissingDateTime,
    BadDateTime,
    MissingIaq,
}

fn capture<'t>(re: &Regex, text: &'t str) -> Option<&'t str> {
    re.captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
}

fn number(re: &Regex, text: &str) -> Option<f64> {
    capture(re, text)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn parse_block(text: &str) -> Result<LogEntry, BlockSkip> {
    let (date, time) = match (capture(&DATE_RE, text), capture(&TIME_RE, text)) {
        (Some(d), Some(t)) => (d, t),
        _ => return Err(BlockSkip::MissingDateTime),
    };
    let timestamp = parse_date_time(date, time).ok_or(BlockSkip::BadDateTime)?;
    let iaq = number(&IAQ_RE, text).ok_or(BlockSkip::MissingIaq)?;
    Ok(LogEntry {
        source: "SD",
        timestamp,
        date: date.to_string(),
        time: time.to_string(),
        iaq,
        gas_k: number(&GAS_RE, text),
        temp: number(&TEMP_RE, text),
        hum: number(&HUM_RE, text),
        pres: number(&PRES_RE, text),
        lat: number(&LAT_RE, text),
        lon: number(&LON_RE, text),
        alt: number(&ALT_RE, text),
    })
}

/// Parse log text into accepted entries, in file order.
pub fn parse_block_log(content: &str) -> Vec<LogEntry> {
    let mut entries = Vec::new();
    let mut skipped = [0usize; 3];
    let mut block: Vec<&str> = Vec::new();

    let mut flush = |block: &mut Vec<&str>| {
        if block.iter().any(|l| !l.trim().is_empty()) {
            match parse_block(&block.join("\n")) {
                Ok(entry) => entries.push(entry),
                Err(skip) => skipped[skip as usize] += 1,
            }
        }
        block.clear();
    };

    for line in content.lines() {
        if line.trim() == BLOCK_DELIMITER {
            flush(&mut block);
        } else {
            block.push(line);
        }
    }
    flush(&mut block);

    debug!(
        target: "telemetry.block_log",
        accepted = entries.len(),
        missing_date_time = skipped[BlockSkip::MissingDateTime as usize],
        bad_date_time = skipped[BlockSkip::BadDateTime as usize],
        missing_iaq = skipped[BlockSkip::MissingIaq as usize],
        "Parsed block log"
    );
    entries
}

/// Block log file source.
#[derive(Debug, Clone)]
pub struct BlockLog {
    path: PathBuf,
}

impl BlockLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the log. A missing file yields no entries.
    pub fn entries(&self) -> Result<Vec<LogEntry>, SourceError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(target: "telemetry.block_log", path = %self.path.display(), "Block log not found");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(SourceError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        Ok(parse_block_log(&String::from_utf8_lossy(&bytes)))
    }
}

impl TelemetrySource for BlockLog {
    fn describe(&self) -> String {
        format!("block log {}", self.path.display())
    }

    fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError> {
        Ok(self.entries()?.iter().map(LogEntry::to_raw).collect())
    }
}

/// Write entries as a JSON dump readable by [`crate::DumpFile`].
pub fn write_dump(entries: &[LogEntry], path: &Path) -> Result<(), SourceError> {
    let io_err = |source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json).map_err(io_err)?;
    info!(target: "telemetry.block_log", entries = entries.len(), path = %path.display(), "Wrote dump");
    Ok(())
}
