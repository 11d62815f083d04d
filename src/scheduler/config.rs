//! Scheduler configuration

use crate::error::{ErrorCode, LoadgridError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BATCH_SIZE: usize = 1000;
/// Upper bound on work events per invocation
pub const MAX_BATCH_SIZE: usize = 100_000;
pub const DEFAULT_SELF_EVENT_NAME: &str = "raiseEvents";

/// Fixed parameters of a scheduling run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Name given to every emitted unit of work
    pub output_event_name: String,

    /// Spacing between consecutive work events (millisecond resolution)
    #[serde(with = "humantime_serde")]
    pub time_between_events: Duration,

    /// Total work events to emit across the whole run
    pub target_count: u64,

    /// Work events emitted per invocation
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Name of the event that re-invokes the scheduler
    #[serde(default = "default_self_event_name")]
    pub self_event_name: String,
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_self_event_name() -> String {
    DEFAULT_SELF_EVENT_NAME.to_string()
}

impl SchedulerConfig {
    /// Configuration with default batch size and self-event name
    pub fn new(
        output_event_name: impl Into<String>,
        time_between_events: Duration,
        target_count: u64,
    ) -> Self {
        Self {
            output_event_name: output_event_name.into(),
            time_between_events,
            target_count,
            batch_size: DEFAULT_BATCH_SIZE,
            self_event_name: DEFAULT_SELF_EVENT_NAME.to_string(),
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_self_event_name(mut self, name: impl Into<String>) -> Self {
        self.self_event_name = name.into();
        self
    }

    /// Spacing between events in whole milliseconds
    pub fn time_between_millis(&self) -> i64 {
        i64::try_from(self.time_between_events.as_millis()).unwrap_or(i64::MAX)
    }

    /// Check the configuration before a scheduler is built from it
    pub fn validate(&self) -> Result<(), LoadgridError> {
        let invalid =
            |msg: String| LoadgridError::config_with_code(ErrorCode::CONFIG_INVALID_VALUE, msg);

        if self.output_event_name.trim().is_empty() {
            return Err(invalid("'output_event_name' must not be empty".into()));
        }
        if self.self_event_name.trim().is_empty() {
            return Err(invalid("'self_event_name' must not be empty".into()));
        }
        if self.self_event_name == self.output_event_name {
            return Err(invalid(format!(
                "'self_event_name' and 'output_event_name' are both '{}'",
                self.output_event_name
            )));
        }
        if self.time_between_millis() < 1 {
            return Err(invalid(format!(
                "'time_between_events' must be at least 1ms, got {:?}",
                self.time_between_events
            )));
        }
        if self.batch_size == 0 {
            return Err(invalid("'batch_size' must be 1 or more".into()));
        }
        if self.batch_size > MAX_BATCH_SIZE {
            return Err(invalid(format!(
                "'batch_size' must be at most {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }
        Ok(())
    }
}
