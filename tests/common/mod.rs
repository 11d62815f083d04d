//! Common test utilities and helpers

#![allow(dead_code)]

use loadgrid::events::{Event, EventResult};
use loadgrid::results::ResultRecord;
use loadgrid::scheduler::{EventScheduler, FixedClock, SchedulerConfig};
use loadgrid::store::{MemoryResultStore, ResultStore};
use std::sync::Arc;
use std::time::Duration;

/// Clock value used by scheduler fixtures
pub const NOW: i64 = 1_700_000_000_000;

/// Scheduler with a fixed clock
pub fn scheduler(target: u64, batch: usize, interval_ms: u64) -> EventScheduler {
    let config = SchedulerConfig::new("work", Duration::from_millis(interval_ms), target)
        .with_batch_size(batch);
    EventScheduler::new(config)
        .expect("valid scheduler config")
        .with_clock(FixedClock(NOW))
}

/// Every invocation result of a run, feeding each self-event back in
pub fn drive_to_completion(scheduler: &EventScheduler, max_invocations: usize) -> Vec<EventResult> {
    let self_name = scheduler.config().self_event_name.clone();
    let mut results = Vec::new();
    let mut next = Some(scheduler.start_event());

    while let Some(event) = next.take() {
        assert!(results.len() < max_invocations, "scheduler did not terminate");
        let result = scheduler.process(&event);
        next = result
            .follow_up_events()
            .iter()
            .find(|e| e.name() == self_name)
            .cloned();
        results.push(result);
    }
    results
}

/// Work events across a whole run, in emission order
pub fn work_events<'a>(results: &'a [EventResult], name: &'a str) -> Vec<&'a Event> {
    results
        .iter()
        .flat_map(|r| r.follow_up_events())
        .filter(|e| e.name() == name)
        .collect()
}

/// Memory store seeded with `records`
pub async fn memory_store(records: Vec<ResultRecord>) -> Arc<MemoryResultStore> {
    let store = Arc::new(MemoryResultStore::new());
    store.append(records).await.expect("append to memory store");
    store
}

/// `count` records of `name` evenly spaced from `start` by `step` ms
pub fn evenly_spaced(name: &str, start: i64, step: i64, count: usize) -> Vec<ResultRecord> {
    (0..count as i64)
        .map(|i| {
            let t = start + i * step;
            ResultRecord::new(name, t, t + 5, i % 7 != 0)
        })
        .collect()
}
