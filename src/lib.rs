// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod render;
pub mod table;
pub mod types;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use tokio::runtime::Handle;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, discover_config, load_and_validate, parse_duration};
use crate::engine::{ExecutionController, TickScheduler};
use crate::exec::ProcessPool;
use crate::render::TerminalDisplay;
use crate::render::format::{command_list_header, command_list_row};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - process pool, terminal display and tick scheduler
/// - the controller, driven by a polling loop on this thread
/// - Ctrl-C handling (kill everything, bounded shutdown)
///
/// Returns the process exit code: 0 if every command exited with 0.
pub fn run(args: CliArgs) -> Result<i32> {
    let cfg = resolve_config(&args)?;
    let tick = parse_tick(&args.tick)?;

    let pool = ProcessPool::new(cfg.pool.clone()).context("starting process pool")?;

    let interrupted = Arc::new(AtomicBool::new(false));
    watch_ctrl_c(pool.handle(), Arc::clone(&interrupted));

    let display = TerminalDisplay::new(std::io::stdout(), cfg.display.clone());
    let scheduler = TickScheduler::new(tick);
    let mut controller =
        ExecutionController::new(pool, display, scheduler, cfg.min_check_interval);

    for command in &args.commands {
        if let Err(err) = controller.execute(command) {
            controller.stop();
            return Err(err).with_context(|| format!("starting `{command}`"));
        }
    }

    while controller.scheduler().is_enabled() {
        if interrupted.load(Ordering::SeqCst) {
            warn!("interrupted; terminating running commands");
            controller.stop();
            controller.check_now();
            break;
        }

        if controller.scheduler_mut().fire(Instant::now()) {
            controller.check();
        }

        let wait = controller
            .scheduler()
            .time_until_due(Instant::now())
            .unwrap_or(Duration::ZERO);
        std::thread::sleep(wait.min(tick));
    }

    print_summary(controller.table().iter(), cfg.display.command_width);

    let all_ok = controller
        .processes()
        .all(|p| p.exit_code() == Some(0));
    info!(all_ok, "all commands done");
    Ok(if all_ok { 0 } else { 1 })
}

/// Parse the `--tick` value. A zero tick would turn the polling loop into a
/// busy loop, so it is rejected.
pub fn parse_tick(value: &str) -> Result<Duration> {
    let tick = parse_duration(value).map_err(|e| anyhow!("invalid --tick: {e}"))?;
    if tick.is_zero() {
        return Err(anyhow!("invalid --tick: must be greater than zero"));
    }
    Ok(tick)
}

/// Config file (explicit path or discovered), then CLI overrides.
fn resolve_config(args: &CliArgs) -> Result<ConfigFile> {
    let mut cfg = match &args.config {
        Some(path) => {
            load_and_validate(path).with_context(|| format!("loading config from {path}"))?
        }
        None => discover_config().context("loading config")?,
    };

    if let Some(ref interval) = args.min_check_interval {
        cfg.min_check_interval = parse_duration(interval)
            .map_err(|e| anyhow!("invalid --min-check-interval: {e}"))?;
    }

    Ok(cfg)
}

/// Ctrl-C sets `flag`; the polling loop picks it up.
fn watch_ctrl_c(handle: &Handle, flag: Arc<AtomicBool>) {
    handle.spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        flag.store(true, Ordering::SeqCst);
    });
}

fn print_summary<'a>(
    processes: impl Iterator<Item = &'a table::TrackedProcess>,
    command_width: usize,
) {
    println!();
    for line in command_list_header() {
        println!("{line}");
    }
    for process in processes {
        println!("{}", command_list_row(process, command_width));
    }
}
