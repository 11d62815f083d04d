//! Per-unit payload generation

use serde_json::Value;

/// Supplies the payload attached to each emitted work event.
///
/// Injected into the scheduler at construction so domain data can be
/// attached without touching the scheduling loop.
pub trait PayloadSource: Send + Sync {
    fn next_payload(&self) -> Value;
}

/// Attaches no data to emitted events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPayload;

impl PayloadSource for NoPayload {
    fn next_payload(&self) -> Value {
        Value::Null
    }
}

impl<F> PayloadSource for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn next_payload(&self) -> Value {
        self()
    }
}
