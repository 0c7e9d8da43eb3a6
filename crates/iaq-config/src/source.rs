//! Telemetry source selection.

use serde::{Deserialize, Serialize};

use crate::validate::ValidationError;

pub const DEFAULT_STORE_PATH: &str = "telemetry.db";
pub const DEFAULT_STORE_TABLE: &str = "telemetries";

/// Which collaborator supplies raw telemetry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Embedded SQLite store: database file and table ("collection").
    Store { path: String, table: String },
    /// CSV or JSON dump file.
    Dump { path: String },
    /// Free-text block log from the payload's SD card.
    BlockLog { path: String },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::Store {
            path: DEFAULT_STORE_PATH.to_string(),
            table: DEFAULT_STORE_TABLE.to_string(),
        }
    }
}

impl SourceConfig {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SourceConfig::Store { .. } => "store",
            SourceConfig::Dump { .. } => "dump",
            SourceConfig::BlockLog { .. } => "block_log",
        }
    }

    pub fn path(&self) -> &str {
        match self {
            SourceConfig::Store { path, .. }
            | SourceConfig::Dump { path }
            | SourceConfig::BlockLog { path } => path,
        }
    }

    pub(crate) fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.path().trim().is_empty() {
            errors.push(ValidationError::new("source.path", "must not be empty"));
        }
        if let SourceConfig::Store { table, .. } = self {
            if !is_identifier(table) {
                errors.push(ValidationError::new(
                    "source.table",
                    "must be a plain identifier ([A-Za-z_][A-Za-z0-9_]*)",
                ));
            }
        }
        errors
    }
}

/// Table names are spliced into SQL, so only plain identifiers are allowed.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
