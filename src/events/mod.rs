//! Event model and the processor boundary
//!
//! Executors hand each dequeued [`Event`] to an [`EventProcessor`] and
//! durably enqueue the follow-up events of the returned [`EventResult`].

mod types;

pub use types::{Event, EventResult};

/// Processes one event to completion and reports what should happen next.
///
/// Implementations run synchronously and must not keep state between
/// invocations that is not carried in the events themselves.
pub trait EventProcessor: Send + Sync {
    /// Process a single event
    fn process_event(&self, event: &Event) -> EventResult;

    /// Whether results produced by this processor belong in performance charts
    fn chart(&self) -> bool {
        true
    }
}
