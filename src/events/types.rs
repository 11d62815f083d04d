//! Event and result value types shared by schedulers and executors

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named, time-stamped unit of scheduled work.
///
/// Events are immutable once created. The payload is opaque to everything but
/// the processor that consumes the event; `Value::Null` means "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    name: String,
    scheduled_time: i64,
    #[serde(default)]
    payload: Value,
}

impl Event {
    /// Create an event carrying a payload
    pub fn new(name: impl Into<String>, scheduled_time: i64, payload: Value) -> Self {
        Self {
            name: name.into(),
            scheduled_time,
            payload,
        }
    }

    /// Create an event without payload data
    pub fn empty(name: impl Into<String>, scheduled_time: i64) -> Self {
        Self::new(name, scheduled_time, Value::Null)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Epoch milliseconds at which the event becomes due
    pub fn scheduled_time(&self) -> i64 {
        self.scheduled_time
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    pub fn into_payload(self) -> Value {
        self.payload
    }
}

/// Outcome of processing one [`Event`].
///
/// A successful result without follow-up events is terminal. A failed result
/// never carries follow-up events and implies no side effects were applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResult {
    message: String,
    success: bool,
    #[serde(default)]
    follow_up_events: Vec<Event>,
}

impl EventResult {
    /// Successful result scheduling the given follow-up events, in order
    pub fn success(message: impl Into<String>, follow_up_events: Vec<Event>) -> Self {
        Self {
            message: message.into(),
            success: true,
            follow_up_events,
        }
    }

    /// Failed result; no follow-up events are ever attached
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            success: false,
            follow_up_events: Vec::new(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn follow_up_events(&self) -> &[Event] {
        &self.follow_up_events
    }

    pub fn into_follow_up_events(self) -> Vec<Event> {
        self.follow_up_events
    }

    /// True for a successful result that schedules nothing further
    pub fn is_terminal(&self) -> bool {
        self.success && self.follow_up_events.is_empty()
    }
}
