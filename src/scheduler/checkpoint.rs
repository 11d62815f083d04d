//! Scheduler progress carried between invocations
//!
//! The checkpoint travels as the payload of the scheduler's own self-event.
//! It is decoded exactly once, at the entry of each invocation.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

/// Progress of a scheduling run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchedulerCheckpoint {
    /// Work events emitted so far across all invocations
    pub total_emitted: u64,
    /// Scheduled time of the most recently emitted work event
    pub last_event_time: i64,
}

impl SchedulerCheckpoint {
    /// Starting point for a run that has emitted nothing yet
    pub fn start(now: i64) -> Self {
        Self {
            total_emitted: 0,
            last_event_time: now,
        }
    }

    /// Encode as an event payload
    pub fn to_payload(&self) -> Value {
        json!({
            "totalEmitted": self.total_emitted,
            "lastEventTime": self.last_event_time,
        })
    }
}

/// What a scheduler invocation was started with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inbound {
    /// No payload: cold start of a new run
    Fresh,
    /// Checkpoint from the previous invocation of the same run
    Resume(SchedulerCheckpoint),
}

/// The inbound payload is not something this scheduler emitted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid scheduler payload: {reason}")]
pub struct InvalidInbound {
    pub reason: String,
}

impl Inbound {
    /// Decode an inbound payload against the run's target count
    pub fn decode(payload: &Value, target_count: u64) -> Result<Self, InvalidInbound> {
        if payload.is_null() {
            return Ok(Self::Fresh);
        }
        if !payload.is_object() {
            return Err(InvalidInbound {
                reason: format!("expected a checkpoint object, found {}", kind_of(payload)),
            });
        }
        let checkpoint: SchedulerCheckpoint =
            serde_json::from_value(payload.clone()).map_err(|e| InvalidInbound {
                reason: e.to_string(),
            })?;
        if checkpoint.total_emitted > target_count {
            return Err(InvalidInbound {
                reason: format!(
                    "checkpoint claims {} emitted events but the target is {}",
                    checkpoint.total_emitted, target_count
                ),
            });
        }
        Ok(Self::Resume(checkpoint))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
