//! Structured dump files: CSV tables or JSON document arrays.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::SourceError;
use crate::raw::{RawRecord, RawTimestamp, RawValue, READING_FIELDS};
use crate::source::TelemetrySource;

const TIMESTAMP_FIELD: &str = "createdAt";

/// A dump file. `.json` is read as an array of documents, anything else as CSV.
#[derive(Debug, Clone)]
pub struct DumpFile {
    path: PathBuf,
}

impl DumpFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_json(&self) -> bool {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"))
    }

    fn open(&self) -> Result<File, SourceError> {
        File::open(&self.path).map_err(|source| SourceError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn read_csv(&self) -> Result<Vec<RawRecord>, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(self.open()?);
        let headers = reader.headers()?.clone();
        let index_of = |name: &str| headers.iter().position(|h| h == name);

        let ts_col = index_of(TIMESTAMP_FIELD);
        let pair_cols = index_of("date").zip(index_of("time"));
        if ts_col.is_none() && pair_cols.is_none() {
            return Err(SourceError::Configuration(format!(
                "{} must include '{}' or ('date' and 'time') columns",
                self.path.display(),
                TIMESTAMP_FIELD
            )));
        }
        let reading_cols: Vec<Option<usize>> = READING_FIELDS.iter().map(|f| index_of(*f)).collect();

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i)).filter(|s| !s.is_empty());

            let timestamp = match (ts_col, pair_cols) {
                (Some(i), _) => cell(Some(i)).map_or(RawTimestamp::Missing, |s| {
                    RawTimestamp::Text(s.to_string())
                }),
                (None, Some((d, t))) => match (cell(Some(d)), cell(Some(t))) {
                    (Some(date), Some(time)) => RawTimestamp::DateTime {
                        date: date.to_string(),
                        time: time.to_string(),
                    },
                    _ => RawTimestamp::Missing,
                },
                (None, None) => RawTimestamp::Missing,
            };

            let mut record = RawRecord::at(timestamp);
            for (field, col) in READING_FIELDS.iter().zip(&reading_cols) {
                if let (Some(slot), Some(text)) = (record.field_mut(field), cell(*col)) {
                    *slot = RawValue::Text(text.to_string());
                }
            }
            records.push(record);
        }
        Ok(records)
    }

    fn read_json(&self) -> Result<Vec<RawRecord>, SourceError> {
        let doc: Value = serde_json::from_reader(BufReader::new(self.open()?))?;
        let items = doc.as_array().ok_or_else(|| {
            SourceError::Configuration(format!(
                "{} must contain a JSON array of telemetry documents",
                self.path.display()
            ))
        })?;
        Ok(items.iter().map(record_from_json).collect())
    }
}

impl TelemetrySource for DumpFile {
    fn describe(&self) -> String {
        format!("dump {}", self.path.display())
    }

    fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError> {
        if self.is_json() {
            self.read_json()
        } else {
            self.read_csv()
        }
    }
}

fn record_from_json(doc: &Value) -> RawRecord {
    let mut timestamp = doc
        .get(TIMESTAMP_FIELD)
        .map_or(RawTimestamp::Missing, timestamp_from_json);
    if timestamp == RawTimestamp::Missing {
        if let (Some(date), Some(time)) = (
            doc.get("date").and_then(Value::as_str),
            doc.get("time").and_then(Value::as_str),
        ) {
            timestamp = RawTimestamp::DateTime {
                date: date.to_string(),
                time: time.to_string(),
            };
        }
    }

    let mut record = RawRecord::at(timestamp);
    for field in READING_FIELDS {
        if let (Some(slot), Some(v)) = (record.field_mut(field), doc.get(field)) {
            *slot = value_from_json(v);
        }
    }
    record
}

/// Accepts ISO strings, epoch-millisecond numbers, and extended-JSON
/// `{"$date": ...}` / `{"$numberLong": ...}` wrappers.
fn timestamp_from_json(v: &Value) -> RawTimestamp {
    match v {
        Value::String(s) => RawTimestamp::Text(s.clone()),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .map_or(RawTimestamp::Missing, RawTimestamp::EpochMillis),
        Value::Object(map) => match (map.get("$date"), map.get("$numberLong")) {
            (Some(inner), _) => timestamp_from_json(inner),
            (None, Some(Value::String(millis))) => millis
                .trim()
                .parse::<i64>()
                .map_or(RawTimestamp::Missing, RawTimestamp::EpochMillis),
            (None, Some(other)) => timestamp_from_json(other),
            (None, None) => RawTimestamp::Missing,
        },
        _ => RawTimestamp::Missing,
    }
}

fn value_from_json(v: &Value) -> RawValue {
    match v {
        Value::Number(n) => n.as_f64().map_or(RawValue::Missing, RawValue::Number),
        Value::String(s) => RawValue::Text(s.clone()),
        _ => RawValue::Missing,
    }
}
