// Configuration loading and validation (config/rosterlink.toml).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Config file location, relative to the working directory.
pub const CONFIG_FILE: &str = "config/rosterlink.toml";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    Validation { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub fetch: FetchConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            paths: PathsConfig::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Where the registry snapshot and the roster tables live.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub registry: String,
    pub tables: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        PathsConfig {
            registry: "data/players.json".into(),
            tables: "data/csv".into(),
        }
    }
}

/// Registry refresh settings. Disabled by default: the batch then runs
/// entirely from the snapshot on disk.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub enabled: bool,
    pub season: String,
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        FetchConfig {
            enabled: false,
            season: "2025-26".into(),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Load configuration from `config/rosterlink.toml` under `base_dir`. A
/// missing file yields the defaults; a malformed one is an error.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join(CONFIG_FILE);

    let config = if path.exists() {
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;
        toml::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            source: e,
        })?
    } else {
        debug!("no config file at {}, using defaults", path.display());
        Config::default()
    };

    validate(&config)?;
    Ok(config)
}

/// Convenience wrapper: loads config relative to the working directory.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|e| ConfigError::Io {
        path: PathBuf::from("."),
        source: e,
    })?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.paths.registry.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "paths.registry".into(),
            message: "must not be empty".into(),
        });
    }

    if config.paths.tables.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "paths.tables".into(),
            message: "must not be empty".into(),
        });
    }

    if config.fetch.season.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "fetch.season".into(),
            message: "must not be empty".into(),
        });
    }

    if config.fetch.timeout_secs == 0 {
        return Err(ConfigError::Validation {
            field: "fetch.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
