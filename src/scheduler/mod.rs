//! Checkpointed event scheduler
//!
//! Emits a bounded batch of future-dated work events per invocation and
//! re-schedules itself with a [`SchedulerCheckpoint`] until the run's target
//! count is reached. No state survives between invocations other than the
//! checkpoint carried in the self-event, so any worker may pick up the next
//! batch.
//!
//! ```text
//! Idle -> Emitting(batch) -> Resumed (self-event emitted) -> Emitting ...
//!                         -> Exhausted (terminal)
//! ```

mod checkpoint;
mod clock;
mod config;
mod payload;

pub use checkpoint::{Inbound, InvalidInbound, SchedulerCheckpoint};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    SchedulerConfig, DEFAULT_BATCH_SIZE, DEFAULT_SELF_EVENT_NAME, MAX_BATCH_SIZE,
};
pub use payload::{NoPayload, PayloadSource};

use crate::error::{ErrorCode, LoadgridError};
use crate::events::{Event, EventProcessor, EventResult};
use std::sync::Arc;
use tracing::{debug, error, info};

/// Message of the failed result returned for a payload this scheduler did not emit
pub const ERR_INCORRECT_INBOUND_TYPE: &str = "The event processor takes no initial input.";

/// Failed result reported for a rejected invocation
///
/// A foreign payload always gets [`ERR_INCORRECT_INBOUND_TYPE`]; other
/// failures carry the error text with its code.
pub fn failure_result(error: &LoadgridError) -> EventResult {
    if error.code() == ErrorCode::SCHEDULER_INVALID_INBOUND {
        EventResult::failure(ERR_INCORRECT_INBOUND_TYPE)
    } else {
        EventResult::failure(error.to_string())
    }
}

/// Where a run stands after an invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// A self-event carrying this checkpoint was emitted
    Resumed(SchedulerCheckpoint),
    /// The target count has been reached; nothing further is scheduled
    Exhausted,
    /// The invocation was rejected
    Failed,
}

/// Resumable generator of evenly spaced work events
pub struct EventScheduler {
    config: SchedulerConfig,
    time_between: i64,
    payloads: Arc<dyn PayloadSource>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EventScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventScheduler")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EventScheduler {
    /// Create a scheduler, validating its configuration
    pub fn new(config: SchedulerConfig) -> Result<Self, LoadgridError> {
        config.validate()?;
        Ok(Self {
            time_between: config.time_between_millis(),
            config,
            payloads: Arc::new(NoPayload),
            clock: Arc::new(SystemClock),
        })
    }

    /// Attach data to each emitted work event
    pub fn with_payload_source(mut self, source: impl PayloadSource + 'static) -> Self {
        self.payloads = Arc::new(source);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Event that starts a new run when handed back to [`Self::process`]
    pub fn start_event(&self) -> Event {
        Event::empty(self.config.self_event_name.clone(), self.clock.now_millis())
    }

    /// Run one invocation: decode the inbound payload and emit the next batch
    pub fn process(&self, event: &Event) -> EventResult {
        self.try_process(event).unwrap_or_else(|e| failure_result(&e))
    }

    /// Like [`Self::process`], but a rejected invocation keeps its typed error
    ///
    /// A foreign payload is `SCHEDULER_INVALID_INBOUND`; running past the
    /// representable time range is `SCHEDULER_TIME_OVERFLOW`.
    pub fn try_process(&self, event: &Event) -> Result<EventResult, LoadgridError> {
        let start = match Inbound::decode(event.payload(), self.config.target_count) {
            Ok(Inbound::Fresh) => SchedulerCheckpoint::start(self.clock.now_millis()),
            Ok(Inbound::Resume(checkpoint)) => checkpoint,
            Err(e) => {
                error!(event = event.name(), "Rejecting scheduler input: {}", e);
                return Err(LoadgridError::scheduler_with_code(
                    ErrorCode::SCHEDULER_INVALID_INBOUND,
                    e.to_string(),
                ));
            }
        };

        self.emit_batch(start).inspect_err(|e| {
            error!(event = event.name(), "Scheduling failed: {}", e);
        })
    }

    fn emit_batch(&self, start: SchedulerCheckpoint) -> Result<EventResult, LoadgridError> {
        let remaining = self.config.target_count - start.total_emitted;
        let batch = usize::try_from(remaining)
            .unwrap_or(usize::MAX)
            .min(self.config.batch_size);

        let mut events = Vec::with_capacity(batch.saturating_add(1));
        let mut checkpoint = start;
        for _ in 0..batch {
            checkpoint.last_event_time = checkpoint
                .last_event_time
                .checked_add(self.time_between)
                .ok_or_else(|| {
                    LoadgridError::scheduler_with_code(
                        ErrorCode::SCHEDULER_TIME_OVERFLOW,
                        format!(
                            "cannot schedule past {} with a spacing of {}ms",
                            checkpoint.last_event_time, self.time_between
                        ),
                    )
                })?;
            checkpoint.total_emitted += 1;
            events.push(Event::new(
                self.config.output_event_name.clone(),
                checkpoint.last_event_time,
                self.payloads.next_payload(),
            ));
        }

        if checkpoint.total_emitted < self.config.target_count {
            debug!(
                "Rescheduling '{}' at {} after {}/{} events",
                self.config.self_event_name,
                checkpoint.last_event_time,
                checkpoint.total_emitted,
                self.config.target_count
            );
            events.push(Event::new(
                self.config.self_event_name.clone(),
                checkpoint.last_event_time,
                checkpoint.to_payload(),
            ));
        } else {
            info!(
                "Scheduling of '{}' complete: {} events",
                self.config.output_event_name, checkpoint.total_emitted
            );
        }

        Ok(EventResult::success(
            format!(
                "Scheduled {:>3} events named {}.",
                batch, self.config.output_event_name
            ),
            events,
        ))
    }

    /// Classify a result produced by this scheduler
    pub fn classify(&self, result: &EventResult) -> SchedulerState {
        if !result.is_success() {
            return SchedulerState::Failed;
        }
        result
            .follow_up_events()
            .iter()
            .rev()
            .find(|event| event.name() == self.config.self_event_name)
            .and_then(
                |event| match Inbound::decode(event.payload(), self.config.target_count) {
                    Ok(Inbound::Resume(checkpoint)) => Some(checkpoint),
                    _ => None,
                },
            )
            .map_or(SchedulerState::Exhausted, SchedulerState::Resumed)
    }
}

impl EventProcessor for EventScheduler {
    fn process_event(&self, event: &Event) -> EventResult {
        self.process(event)
    }

    fn chart(&self) -> bool {
        false
    }
}
