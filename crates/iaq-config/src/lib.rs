//! IAQ forecast trainer configuration.
//!
//! This crate provides:
//! - Typed configuration for the training run and data source selection
//! - Config resolution (CLI/env overrides → config file → defaults)
//! - Semantic validation reporting every violation at once

pub mod resolve;
pub mod source;
pub mod train;
pub mod validate;

pub use resolve::{default_config_path, load_file, resolve_config, ConfigOverrides};
pub use source::SourceConfig;
pub use train::{IaqRange, LogisticConfig, TrainConfig};
pub use validate::{ConfigError, ValidationError};
