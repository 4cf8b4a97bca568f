// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `asyncdo`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "asyncdo",
    version,
    about = "Run shell commands concurrently and stream their output as they go.",
    long_about = None
)]
pub struct CliArgs {
    /// Commands to run, each interpreted by the shell.
    #[arg(value_name = "COMMAND", required = true)]
    pub commands: Vec<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `$ASYNCDO_CONFIG`, else `asyncdo.toml` if present.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Minimum time between two checks, e.g. `250ms`. Overrides the config.
    #[arg(long, value_name = "DURATION")]
    pub min_check_interval: Option<String>,

    /// How often the poll trigger fires, e.g. `50ms`.
    #[arg(long, value_name = "DURATION", default_value = "50ms")]
    pub tick: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ASYNCDO_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
