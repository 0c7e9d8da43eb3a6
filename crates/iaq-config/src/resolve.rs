//! Config resolution: explicit overrides → config file → defaults.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::source::{SourceConfig, DEFAULT_STORE_PATH, DEFAULT_STORE_TABLE};
use crate::train::TrainConfig;
use crate::validate::ConfigError;

const APP_DIR: &str = "iaq-forecast";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Values supplied on the command line or through the environment.
///
/// Every field is optional; `None` leaves the file/default value in place.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub horizon_steps: Option<usize>,
    pub rolling_window: Option<usize>,
    pub hazard_threshold: Option<f64>,
    pub sample_interval_sec: Option<u32>,
    pub test_fraction: Option<f64>,
    /// Dump file; takes precedence over every other source.
    pub dump_path: Option<String>,
    /// Block log; used when no dump file is given.
    pub log_path: Option<String>,
    pub store_path: Option<String>,
    pub store_table: Option<String>,
    pub model_path: Option<String>,
}

/// `$XDG_CONFIG_HOME/iaq-forecast/config.toml` (platform equivalent elsewhere).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Load a config file; `.json` is parsed as JSON, anything else as TOML.
pub fn load_file(path: &Path) -> Result<TrainConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Resolve the effective configuration and validate it.
///
/// An explicit `config_path` must exist; the default location is only read
/// when present.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<TrainConfig, ConfigError> {
    let mut config = match config_path {
        Some(path) => load_file(path)?,
        None => match default_config_path().filter(|p| p.exists()) {
            Some(path) => {
                debug!(target: "config.resolve", path = %path.display(), "Using default config file");
                load_file(&path)?
            }
            None => TrainConfig::default(),
        },
    };

    apply_overrides(&mut config, overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Invalid(errors));
    }
    debug!(
        target: "config.resolve",
        source = config.source.kind(),
        horizon_steps = config.horizon_steps,
        rolling_window = config.rolling_window,
        hazard_threshold = config.hazard_threshold,
        "Resolved training config"
    );
    Ok(config)
}

fn apply_overrides(config: &mut TrainConfig, o: &ConfigOverrides) {
    if let Some(v) = o.horizon_steps {
        config.horizon_steps = v;
    }
    if let Some(v) = o.rolling_window {
        config.rolling_window = v;
    }
    if let Some(v) = o.hazard_threshold {
        config.hazard_threshold = v;
    }
    if let Some(v) = o.sample_interval_sec {
        config.sample_interval_sec = v;
    }
    if let Some(v) = o.test_fraction {
        config.test_fraction = v;
    }
    if let Some(v) = &o.model_path {
        config.model_path = v.clone();
    }

    if let Some(path) = non_blank(&o.dump_path) {
        config.source = SourceConfig::Dump { path };
    } else if let Some(path) = non_blank(&o.log_path) {
        config.source = SourceConfig::BlockLog { path };
    } else if o.store_path.is_some() || o.store_table.is_some() {
        let (mut path, mut table) = match &config.source {
            SourceConfig::Store { path, table } => (path.clone(), table.clone()),
            _ => (DEFAULT_STORE_PATH.to_string(), DEFAULT_STORE_TABLE.to_string()),
        };
        if let Some(p) = &o.store_path {
            path = p.clone();
        }
        if let Some(t) = &o.store_table {
            table = t.clone();
        }
        config.source = SourceConfig::Store { path, table };
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
