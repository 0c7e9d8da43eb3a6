//! Timestamp parsing for heterogeneous sources.
//!
//! Zone-less wall-clock values are interpreted as UTC.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::raw::RawTimestamp;

/// Naive layouts tried after RFC 3339, in order.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
    "%d/%m/%Y %I:%M:%S %p",
    "%d/%m/%Y %H:%M:%S",
];

/// Parse a textual timestamp to an absolute instant.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse a separate date and time pair.
pub fn parse_date_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    parse_timestamp(&format!("{} {}", date.trim(), time.trim()))
}

/// Resolve any raw timestamp shape.
pub fn resolve(raw: &RawTimestamp) -> Option<DateTime<Utc>> {
    match raw {
        RawTimestamp::Missing => None,
        RawTimestamp::Instant(dt) => Some(*dt),
        RawTimestamp::EpochMillis(ms) => Utc.timestamp_millis_opt(*ms).single(),
        RawTimestamp::Text(s) => parse_timestamp(s),
        RawTimestamp::DateTime { date, time } => parse_date_time(date, time),
    }
}
