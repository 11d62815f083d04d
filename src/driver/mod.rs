//! In-process execution of scheduled events
//!
//! Distributed deployments hand events to an external queue and worker
//! pool. This module is the local stand-in used by the `run` command and by
//! tests: a time-ordered queue, a name-to-processor registry and an executor
//! that records one [`crate::results::ResultRecord`] per processed event.

mod executor;
mod queue;
mod registry;

pub use executor::{LocalExecutor, RunSummary, DEFAULT_FLUSH_EVERY};
pub use queue::EventQueue;
pub use registry::{NoopProcessor, ProcessorRegistry};

use std::sync::Arc;

use crate::scheduler::EventScheduler;

/// Registry routing a scheduler's self-events back to it
///
/// Work events go to [`NoopProcessor`] unless `work` already handles them.
pub fn scheduler_registry(
    scheduler: Arc<EventScheduler>,
    mut work: ProcessorRegistry,
) -> ProcessorRegistry {
    let config = scheduler.config();
    let output = config.output_event_name.clone();
    let self_name = config.self_event_name.clone();
    if !work.contains(&output) {
        work.register(output, Arc::new(NoopProcessor));
    }
    work.register(self_name, scheduler);
    work
}
