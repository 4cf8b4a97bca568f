// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AsyncDoError, Result};
use crate::exec::PoolOptions;
use crate::render::DisplayOptions;

/// The command list needs room for at least one character plus `...`.
const MIN_COMMAND_WIDTH: usize = 4;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::AsyncDoError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let min_check_interval =
            parse_key("controller.min_check_interval", &raw.controller.min_check_interval)?;
        let pool = validate_pool(&raw)?;
        let display = validate_display(&raw)?;
        Ok(ConfigFile::new_unchecked(min_check_interval, pool, display))
    }
}

fn validate_pool(cfg: &RawConfigFile) -> Result<PoolOptions> {
    let stop_timeout = parse_key("pool.stop_timeout", &cfg.pool.stop_timeout)?;

    if cfg.pool.worker_threads == Some(0) {
        return Err(AsyncDoError::ConfigError(
            "[pool].worker_threads must be >= 1 (got 0)".to_string(),
        ));
    }

    let shell = match cfg.pool.shell.as_deref().map(str::trim) {
        Some("") => {
            return Err(AsyncDoError::ConfigError(
                "[pool].shell must not be empty".to_string(),
            ));
        }
        Some(s) => Some(s.to_string()),
        None => None,
    };

    Ok(PoolOptions {
        stop_timeout,
        worker_threads: cfg.pool.worker_threads,
        shell,
    })
}

fn validate_display(cfg: &RawConfigFile) -> Result<DisplayOptions> {
    if cfg.display.command_width < MIN_COMMAND_WIDTH {
        return Err(AsyncDoError::ConfigError(format!(
            "[display].command_width must be >= {MIN_COMMAND_WIDTH} (got {})",
            cfg.display.command_width
        )));
    }

    Ok(DisplayOptions {
        command_width: cfg.display.command_width,
        stderr_prefix: cfg.display.stderr_prefix.clone(),
    })
}

fn parse_key(key: &str, value: &str) -> Result<Duration> {
    parse_duration(value)
        .map_err(|e| AsyncDoError::ConfigError(format!("invalid duration for {key}: {e}")))
}

/// Parse a simple duration string like `"3s"`, `"250ms"`, `"1m"`, `"2h"`.
pub fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .ok_or_else(|| "duration missing unit suffix".to_string())?;

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs_per_unit = match unit.as_str() {
        "ms" => return Ok(Duration::from_millis(value)),
        "s" => 1,
        "m" => 60,
        "h" => 60 * 60,
        _ => {
            return Err(format!(
                "unsupported duration unit '{}'; expected ms, s, m, or h",
                unit
            ));
        }
    };

    value
        .checked_mul(secs_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| format!("duration too large: '{s}'"))
}
