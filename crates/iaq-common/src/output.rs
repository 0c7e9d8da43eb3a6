//! Output format selection for CLI reports.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a command renders its result on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Short human-readable summary.
    #[default]
    Summary,
    /// Pretty-printed JSON.
    Json,
}
