// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Environment variable naming a config file to use instead of the default.
pub const CONFIG_ENV_VAR: &str = "ASYNCDO_CONFIG";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** check values.
/// Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults for missing sections and keys.
/// - Parses durations and checks numeric bounds.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw_config = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw_config)?;
    debug!(path = ?path.as_ref(), ?config, "loaded config");
    Ok(config)
}

/// Resolve the config to use when none was given on the command line.
///
/// `ASYNCDO_CONFIG` wins; otherwise `asyncdo.toml` in the current directory
/// if it exists. Without either, built-in defaults apply.
pub fn discover_config() -> Result<ConfigFile> {
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return load_and_validate(PathBuf::from(path));
    }

    let path = default_config_path();
    if path.is_file() {
        return load_and_validate(path);
    }

    Ok(ConfigFile::default())
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("asyncdo.toml")
}
