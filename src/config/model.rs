// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::exec::PoolOptions;
use crate::render::DisplayOptions;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [controller]
/// min_check_interval = "500ms"
///
/// [pool]
/// stop_timeout = "1s"
/// worker_threads = 2
/// shell = "bash"
///
/// [display]
/// command_width = 30
/// stderr_prefix = "E> "
/// ```
///
/// All sections are optional and have reasonable defaults. Durations are
/// kept as strings here and parsed during validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub controller: ControllerSection,

    #[serde(default)]
    pub pool: PoolSection,

    #[serde(default)]
    pub display: DisplaySection,
}

/// `[controller]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ControllerSection {
    /// Minimum time between two real checks; extra triggers in between are
    /// ignored.
    #[serde(default = "default_min_check_interval")]
    pub min_check_interval: String,
}

fn default_min_check_interval() -> String {
    "500ms".to_string()
}

impl Default for ControllerSection {
    fn default() -> Self {
        Self {
            min_check_interval: default_min_check_interval(),
        }
    }
}

/// `[pool]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSection {
    /// Upper bound on how long shutdown waits for readers.
    #[serde(default = "default_stop_timeout")]
    pub stop_timeout: String,

    #[serde(default)]
    pub worker_threads: Option<usize>,

    /// Shell interpreting commands; the platform shell when unset.
    #[serde(default)]
    pub shell: Option<String>,
}

fn default_stop_timeout() -> String {
    "1s".to_string()
}

impl Default for PoolSection {
    fn default() -> Self {
        Self {
            stop_timeout: default_stop_timeout(),
            worker_threads: None,
            shell: None,
        }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySection {
    #[serde(default = "default_command_width")]
    pub command_width: usize,

    #[serde(default = "default_stderr_prefix")]
    pub stderr_prefix: String,
}

fn default_command_width() -> usize {
    30
}

fn default_stderr_prefix() -> String {
    "E> ".to_string()
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            command_width: default_command_width(),
            stderr_prefix: default_stderr_prefix(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (or `Default`), so every
/// value in here has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub min_check_interval: Duration,
    pub pool: PoolOptions,
    pub display: DisplayOptions,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        min_check_interval: Duration,
        pool: PoolOptions,
        display: DisplayOptions,
    ) -> Self {
        Self {
            min_check_interval,
            pool,
            display,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            min_check_interval: Duration::from_millis(500),
            pool: PoolOptions::default(),
            display: DisplayOptions::default(),
        }
    }
}
