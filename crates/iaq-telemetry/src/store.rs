//! Live store: an embedded SQLite telemetry table.

use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension};
use tracing::debug;

use crate::error::SourceError;
use crate::raw::{RawRecord, RawTimestamp, RawValue, READING_FIELDS};
use crate::source::TelemetrySource;

const TIMESTAMP_COLUMN: &str = "createdAt";

/// Read-only view of a telemetry table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    table: String,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>, table: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            table: table.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<Connection, SourceError> {
        if !self.path.exists() {
            return Err(SourceError::NoData(format!(
                "telemetry database {} does not exist",
                self.path.display()
            )));
        }
        Ok(Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?)
    }

    fn columns(&self, conn: &Connection) -> Result<Vec<String>, SourceError> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info(\"{}\")", self.table))?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(1))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}

impl TelemetrySource for SqliteStore {
    fn describe(&self) -> String {
        format!("sqlite {}:{}", self.path.display(), self.table)
    }

    fn fetch_raw(&self) -> Result<Vec<RawRecord>, SourceError> {
        if !iaq_config::source::is_identifier(&self.table) {
            return Err(SourceError::Configuration(format!(
                "invalid table name {:?}",
                self.table
            )));
        }
        let conn = self.open()?;

        let exists = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [self.table.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        if exists.is_none() {
            return Err(SourceError::NoData(format!(
                "table {} not found in {}",
                self.table,
                self.path.display()
            )));
        }

        let columns = self.columns(&conn)?;
        for required in [TIMESTAMP_COLUMN, "iaq"] {
            if !columns.iter().any(|c| c == required) {
                return Err(SourceError::Configuration(format!(
                    "table {} has no {} column",
                    self.table, required
                )));
            }
        }

        let select: Vec<String> = std::iter::once(TIMESTAMP_COLUMN)
            .chain(READING_FIELDS)
            .map(|c| {
                if columns.iter().any(|have| have == c) {
                    format!("\"{c}\"")
                } else {
                    format!("NULL AS \"{c}\"")
                }
            })
            .collect();
        let sql = format!(
            "SELECT {} FROM \"{}\" ORDER BY \"{}\" ASC",
            select.join(", "),
            self.table,
            TIMESTAMP_COLUMN
        );
        debug!(target: "telemetry.store", %sql, "Querying telemetry table");

        let mut stmt = conn.prepare(&sql)?;
        let records = stmt
            .query_map([], |row| {
                let mut record = RawRecord::at(timestamp_from(row.get_ref(0)?));
                for (i, field) in READING_FIELDS.iter().enumerate() {
                    if let Some(slot) = record.field_mut(field) {
                        *slot = value_from(row.get_ref(i + 1)?);
                    }
                }
                Ok(record)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn timestamp_from(v: ValueRef<'_>) -> RawTimestamp {
    match v {
        ValueRef::Integer(ms) => RawTimestamp::EpochMillis(ms),
        ValueRef::Real(ms) if ms.is_finite() => RawTimestamp::EpochMillis(ms as i64),
        ValueRef::Text(bytes) => RawTimestamp::Text(String::from_utf8_lossy(bytes).into_owned()),
        _ => RawTimestamp::Missing,
    }
}

fn value_from(v: ValueRef<'_>) -> RawValue {
    match v {
        ValueRef::Integer(i) => RawValue::Number(i as f64),
        ValueRef::Real(f) => RawValue::Number(f),
        ValueRef::Text(bytes) => RawValue::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Null | ValueRef::Blob(_) => RawValue::Missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iaq_config::IaqRange;
    use tempfile::tempdir;

    fn seed(path: &Path, ddl: &str, inserts: &[&str]) {
        let conn = Connection::open(path).unwrap();
        conn.execute(ddl, []).unwrap();
        for sql in inserts {
            conn.execute(sql, []).unwrap();
        }
    }

    #[test]
    fn reads_sorted_rows_with_missing_optional_columns() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("t.db");
        seed(
            &db,
            "CREATE TABLE telemetries (createdAt TEXT, iaq REAL, gasK REAL, temp TEXT)",
            &[
                "INSERT INTO telemetries VALUES ('2025-01-01T00:00:03Z', 60.0, 11.0, '21.5')",
                "INSERT INTO telemetries VALUES ('2025-01-01T00:00:00Z', 55, NULL, 'bad')",
                "INSERT INTO telemetries VALUES ('2025-01-01T00:00:06Z', NULL, 12.0, '22')",
            ],
        );
        let store = SqliteStore::new(&db, "telemetries");
        let rows = store.load(&IaqRange::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].iaq, 55.0);
        assert_eq!(rows[0].gas_k, None);
        assert_eq!(rows[0].temp, None);
        assert_eq!(rows[1].temp, Some(21.5));
        assert_eq!(rows[1].hum, None);
    }

    #[test]
    fn integer_timestamps_are_epoch_millis() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("t.db");
        seed(
            &db,
            "CREATE TABLE telemetries (createdAt INTEGER, iaq REAL)",
            &["INSERT INTO telemetries VALUES (1700000000000, 42.0)"],
        );
        let rows = SqliteStore::new(&db, "telemetries")
            .load(&IaqRange::default())
            .unwrap();
        assert_eq!(rows[0].timestamp.timestamp(), 1_700_000_000);
    }

    #[test]
    fn missing_table_is_no_data() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("t.db");
        seed(&db, "CREATE TABLE other (x INTEGER)", &[]);
        let err = SqliteStore::new(&db, "telemetries").fetch_raw().unwrap_err();
        assert!(matches!(err, SourceError::NoData(_)));
    }

    #[test]
    fn missing_database_is_no_data() {
        let dir = tempdir().unwrap();
        let err = SqliteStore::new(dir.path().join("absent.db"), "telemetries")
            .fetch_raw()
            .unwrap_err();
        assert!(matches!(err, SourceError::NoData(_)));
    }

    #[test]
    fn missing_iaq_column_is_configuration_error() {
        let dir = tempdir().unwrap();
        let db = dir.path().join("t.db");
        seed(&db, "CREATE TABLE telemetries (createdAt TEXT, temp REAL)", &[]);
        let err = SqliteStore::new(&db, "telemetries").fetch_raw().unwrap_err();
        assert!(matches!(err, SourceError::Configuration(_)));
    }

    #[test]
    fn rejects_unsafe_table_name() {
        let err = SqliteStore::new("x.db", "t\"; DROP TABLE t; --")
            .fetch_raw()
            .unwrap_err();
        assert!(matches!(err, SourceError::Configuration(_)));
    }
}
