// src/engine/ticker.rs

//! Fixed-interval poll scheduler for loop-driven hosts.

use std::time::{Duration, Instant};

use tracing::trace;

use super::PollScheduler;

/// Longest interval between two triggers. Larger ticks are clamped.
pub const MAX_TICK: Duration = Duration::from_secs(24 * 60 * 60);

/// Fires at a fixed tick while enabled.
///
/// The host loop calls [`TickScheduler::fire`] to find out whether to call
/// `check()` now, and [`TickScheduler::time_until_due`] to learn how long it
/// may sleep before asking again.
#[derive(Debug, Clone)]
pub struct TickScheduler {
    tick: Duration,
    next_fire: Option<Instant>,
    rearms: u64,
}

impl TickScheduler {
    pub fn new(tick: Duration) -> Self {
        Self {
            tick: tick.min(MAX_TICK),
            next_fire: None,
            rearms: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.next_fire.is_some()
    }

    /// Consume the trigger if it is due, scheduling the next one a tick
    /// later.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next_fire {
            Some(at) if now >= at => {
                self.next_fire = Some(self.next_after(now));
                true
            }
            _ => false,
        }
    }

    /// Time left until the next trigger; `None` while disabled.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_fire.map(|at| at.saturating_duration_since(now))
    }

    /// How many times the trigger was re-armed.
    pub fn rearms(&self) -> u64 {
        self.rearms
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    fn next_after(&self, now: Instant) -> Instant {
        now.checked_add(self.tick).unwrap_or(now)
    }
}

impl PollScheduler for TickScheduler {
    fn enable(&mut self) {
        if self.next_fire.is_none() {
            self.next_fire = Some(self.next_after(Instant::now()));
        }
    }

    fn disable(&mut self) {
        self.next_fire = None;
    }

    fn rearm(&mut self) {
        if self.next_fire.is_some() {
            self.next_fire = Some(self.next_after(Instant::now()));
            self.rearms += 1;
            trace!(tick_ms = self.tick.as_millis() as u64, "re-armed poll trigger");
        }
    }
}
