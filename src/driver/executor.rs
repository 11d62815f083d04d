//! Single-process executor

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, trace, warn};

use super::queue::EventQueue;
use super::registry::ProcessorRegistry;
use crate::error::Result;
use crate::events::{Event, EventResult};
use crate::results::ResultRecord;
use crate::store::ResultStore;

/// Records buffered before each store append
pub const DEFAULT_FLUSH_EVERY: usize = 500;

/// Counters describing a finished local run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub processed: u64,
    pub succeeded: u64,
    pub failed: u64,
    /// Events for which no processor was registered
    pub unrouted: u64,
    /// Follow-up events enqueued
    pub scheduled: u64,
    /// Events still queued when the run stopped
    pub pending: usize,
    /// True when `max_events` stopped the run early
    pub truncated: bool,
    pub first_event_time: Option<i64>,
    pub last_event_time: Option<i64>,
}

/// Drains an in-process [`EventQueue`] through a [`ProcessorRegistry`]
///
/// Events run in scheduled-time order without waiting for their scheduled
/// time; a record's start time is the event's scheduled time and its end
/// time adds the measured processing time.
pub struct LocalExecutor {
    registry: ProcessorRegistry,
    store: Arc<dyn ResultStore>,
    max_events: Option<u64>,
    flush_every: usize,
}

impl LocalExecutor {
    pub fn new(registry: ProcessorRegistry, store: Arc<dyn ResultStore>) -> Self {
        Self {
            registry,
            store,
            max_events: None,
            flush_every: DEFAULT_FLUSH_EVERY,
        }
    }

    /// Stop after processing this many events
    pub fn with_max_events(mut self, max_events: u64) -> Self {
        self.max_events = Some(max_events);
        self
    }

    pub fn with_flush_every(mut self, flush_every: usize) -> Self {
        self.flush_every = flush_every.max(1);
        self
    }

    /// Process `seed` and every follow-up it leads to
    pub async fn run(&self, seed: impl IntoIterator<Item = Event>) -> Result<RunSummary> {
        let mut queue = EventQueue::new();
        queue.push_all(seed);
        info!(
            "Starting local run with {} seed events, processors: {:?}",
            queue.len(),
            self.registry.names()
        );

        let mut summary = RunSummary::default();
        let mut buffer = Vec::with_capacity(self.flush_every);

        while !queue.is_empty() {
            if self.max_events.is_some_and(|max| summary.processed >= max) {
                summary.truncated = true;
                warn!(
                    "Stopping after {} events with {} still queued",
                    summary.processed,
                    queue.len()
                );
                break;
            }
            let Some(event) = queue.pop() else {
                break;
            };

            let (record, result) = self.execute(&event);
            trace!("{} at {}: {}", event.name(), event.scheduled_time(), result.message());

            summary.processed += 1;
            if result.is_success() {
                summary.succeeded += 1;
            } else {
                summary.failed += 1;
            }
            if !self.registry.contains(event.name()) {
                summary.unrouted += 1;
            }
            summary.first_event_time.get_or_insert(event.scheduled_time());
            summary.last_event_time = Some(event.scheduled_time());

            let follow_ups = result.into_follow_up_events();
            summary.scheduled += follow_ups.len() as u64;
            buffer.push(record);
            queue.push_all(follow_ups);

            if buffer.len() >= self.flush_every {
                self.flush(&mut buffer).await?;
                debug!("Processed {} events so far", summary.processed);
            }
        }

        self.flush(&mut buffer).await?;
        summary.pending = queue.len();
        info!(
            "Local run finished: {} processed, {} failed, {} pending",
            summary.processed, summary.failed, summary.pending
        );
        Ok(summary)
    }

    fn execute(&self, event: &Event) -> (ResultRecord, EventResult) {
        let started = Instant::now();
        let (result, chart) = match self.registry.get(event.name()) {
            Some(processor) => (processor.process_event(event), processor.chart()),
            None => {
                warn!("No processor registered for event '{}'", event.name());
                let message = format!("No processor registered for event '{}'.", event.name());
                (EventResult::failure(message), true)
            }
        };
        let elapsed = i64::try_from(started.elapsed().as_millis()).unwrap_or(i64::MAX);

        let start_time = event.scheduled_time();
        let record = ResultRecord::new(
            event.name(),
            start_time,
            start_time.saturating_add(elapsed),
            result.is_success(),
        )
        .with_chart(chart)
        .with_message(result.message())
        .with_data(event.payload().clone());
        (record, result)
    }

    async fn flush(&self, buffer: &mut Vec<ResultRecord>) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }
        self.store.append(std::mem::take(buffer)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::NoopProcessor;
    use crate::events::EventProcessor;
    use crate::store::{DetailsQuery, MemoryResultStore};

    /// Schedules `n` children of itself named "leaf"
    struct Fanout(usize);

    impl EventProcessor for Fanout {
        fn process_event(&self, event: &Event) -> EventResult {
            let children = (1..=self.0)
                .map(|i| Event::empty("leaf", event.scheduled_time() + i as i64))
                .collect();
            EventResult::success("fanned out", children)
        }

        fn chart(&self) -> bool {
            false
        }
    }

    fn registry() -> ProcessorRegistry {
        let mut registry = ProcessorRegistry::new();
        registry
            .register("root", Arc::new(Fanout(3)))
            .register("leaf", Arc::new(NoopProcessor));
        registry
    }

    #[tokio::test]
    async fn test_runs_follow_ups_and_records_each_event() {
        let store = Arc::new(MemoryResultStore::new());
        let executor = LocalExecutor::new(registry(), store.clone()).with_flush_every(2);

        let summary = executor.run([Event::empty("root", 100)]).await.unwrap();
        assert_eq!(summary.processed, 4);
        assert_eq!(summary.scheduled, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.first_event_time, Some(100));
        assert_eq!(summary.last_event_time, Some(103));
        assert_eq!(store.len().await, 4);

        let root = store
            .event_details(DetailsQuery {
                event_name: Some("root".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!root[0].chart);
    }

    #[tokio::test]
    async fn test_unknown_event_is_recorded_as_failure() {
        let store = Arc::new(MemoryResultStore::new());
        let executor = LocalExecutor::new(registry(), store.clone());

        let summary = executor.run([Event::empty("mystery", 5)]).await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.unrouted, 1);

        let records = store.event_details(DetailsQuery::default()).await.unwrap();
        assert!(!records[0].success);
        assert!(records[0].message.contains("mystery"));
    }

    #[tokio::test]
    async fn test_max_events_truncates() {
        let store = Arc::new(MemoryResultStore::new());
        let executor = LocalExecutor::new(registry(), store.clone()).with_max_events(2);

        let summary = executor.run([Event::empty("root", 0)]).await.unwrap();
        assert!(summary.truncated);
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.pending, 2);
        assert_eq!(store.len().await, 2);
    }
}
