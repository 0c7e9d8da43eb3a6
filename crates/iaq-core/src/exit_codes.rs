//! Exit codes for the iaq-core CLI.
//!
//! Exit codes communicate the run outcome without requiring output parsing.
//! They are stable across releases.

use clap::error::ErrorKind;
use iaq_common::Error;

/// Exit codes for iaq-core operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command completed
    Ok = 0,

    /// Configuration error (bad flag, file, or dump layout)
    ConfigError = 10,

    /// Source produced no usable telemetry
    NoData = 11,

    /// Too few rows to build a supervised example
    InsufficientData = 12,

    /// Model fitting failed (degenerate labels, numerical trouble)
    TrainingError = 13,

    /// I/O or artifact error
    IoError = 14,
}

impl ExitCode {
    /// Map a pipeline error to its exit code.
    pub fn for_error(err: &Error) -> Self {
        match err {
            Error::Config(_) => ExitCode::ConfigError,
            Error::NoData(_) => ExitCode::NoData,
            Error::InsufficientData { .. } => ExitCode::InsufficientData,
            Error::DegenerateLabels(_) | Error::NumericalInstability(_) => ExitCode::TrainingError,
            Error::InvalidArtifact(_) | Error::Io(_) | Error::Json(_) => ExitCode::IoError,
            Error::Source(_) => ExitCode::IoError,
        }
    }

    /// Map a command-line parse failure to its exit code.
    ///
    /// `--help` and `--version` succeed; any other rejected flag, env value,
    /// or missing argument is a configuration error.
    pub fn for_parse_error(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::Ok,
            _ => ExitCode::ConfigError,
        }
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}
