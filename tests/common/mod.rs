#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use asyncdo::exec::{PoolOptions, ProcessEvent, ProcessPool};
use asyncdo::types::ProcessId;

pub use asyncdo_test_utils::{init_tracing, wait_until};

/// Generous upper bound for anything involving real processes.
pub const LIMIT: Duration = Duration::from_secs(10);

pub fn real_pool() -> ProcessPool {
    ProcessPool::new(PoolOptions {
        worker_threads: Some(2),
        ..PoolOptions::default()
    })
    .expect("creating process pool")
}

/// Drain `pool` until every pid in `pids` has delivered its `Completion`.
///
/// Returns all events in arrival order. Panics after [`LIMIT`].
pub fn drain_until_complete(pool: &mut ProcessPool, pids: &[ProcessId]) -> Vec<ProcessEvent> {
    let mut events = Vec::new();
    let finished = wait_until(LIMIT, || {
        events.extend(pool.drain());
        pids.iter().all(|pid| {
            events
                .iter()
                .any(|e| e.is_completion() && e.pid() == *pid)
        })
    });
    assert!(finished, "processes did not complete in time: {events:?}");
    events
}

/// Events grouped per pid, keeping each pid's order.
pub fn by_pid(events: &[ProcessEvent]) -> HashMap<ProcessId, Vec<ProcessEvent>> {
    let mut map: HashMap<ProcessId, Vec<ProcessEvent>> = HashMap::new();
    for event in events {
        map.entry(event.pid()).or_default().push(event.clone());
    }
    map
}
