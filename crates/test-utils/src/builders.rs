#![allow(dead_code)]

use asyncdo::config::{ConfigFile, RawConfigFile};
use asyncdo::exec::ProcessEvent;
use asyncdo::types::{ProcessId, Stream};

/// Builder for the event sequence of one process.
///
/// ```ignore
/// let events = EventScript::for_pid(pid).stdout("a").stderr("b").exit(0);
/// ```
pub struct EventScript {
    pid: ProcessId,
    events: Vec<ProcessEvent>,
}

impl EventScript {
    pub fn for_pid(pid: ProcessId) -> Self {
        Self {
            pid,
            events: Vec::new(),
        }
    }

    pub fn line(mut self, stream: Stream, line: &str) -> Self {
        self.events.push(ProcessEvent::Output {
            pid: self.pid,
            stream,
            line: line.to_string(),
        });
        self
    }

    pub fn stdout(self, line: &str) -> Self {
        self.line(Stream::Stdout, line)
    }

    pub fn stderr(self, line: &str) -> Self {
        self.line(Stream::Stderr, line)
    }

    /// Finish the script with a `Completion`.
    pub fn exit(mut self, exit_code: i32) -> Vec<ProcessEvent> {
        self.events.push(ProcessEvent::Completion {
            pid: self.pid,
            exit_code,
        });
        self.events
    }

    /// Events so far, without a `Completion`.
    pub fn build(self) -> Vec<ProcessEvent> {
        self.events
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn min_check_interval(mut self, value: &str) -> Self {
        self.config.controller.min_check_interval = value.to_string();
        self
    }

    pub fn stop_timeout(mut self, value: &str) -> Self {
        self.config.pool.stop_timeout = value.to_string();
        self
    }

    pub fn worker_threads(mut self, n: usize) -> Self {
        self.config.pool.worker_threads = Some(n);
        self
    }

    pub fn shell(mut self, shell: &str) -> Self {
        self.config.pool.shell = Some(shell.to_string());
        self
    }

    pub fn command_width(mut self, width: usize) -> Self {
        self.config.display.command_width = width;
        self
    }

    pub fn stderr_prefix(mut self, prefix: &str) -> Self {
        self.config.display.stderr_prefix = prefix.to_string();
        self
    }

    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
