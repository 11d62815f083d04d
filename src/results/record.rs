//! Stored outcome of processed events

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One processed event as held by the result store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub id: Uuid,
    pub event_name: String,
    /// Epoch ms processing started; the record's position on the time axis
    pub start_time: i64,
    pub end_time: i64,
    pub success: bool,
    /// False for internal events kept out of performance charts
    #[serde(default = "default_chart")]
    pub chart: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

fn default_chart() -> bool {
    true
}

impl ResultRecord {
    pub fn new(
        event_name: impl Into<String>,
        start_time: i64,
        end_time: i64,
        success: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_name: event_name.into(),
            start_time,
            end_time,
            success,
            chart: true,
            message: String::new(),
            data: Value::Null,
        }
    }

    pub fn with_chart(mut self, chart: bool) -> Self {
        self.chart = chart;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }

    /// Processing time in ms; clock skew never yields a negative duration
    pub fn duration_ms(&self) -> i64 {
        (self.end_time - self.start_time).max(0)
    }
}

/// Row of the raw event detail view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub id: Uuid,
    pub event_name: String,
    pub start_time: i64,
    pub duration: i64,
    pub success: bool,
    pub message: String,
    pub data: Value,
}

impl From<&ResultRecord> for EventDetails {
    fn from(record: &ResultRecord) -> Self {
        Self {
            id: record.id,
            event_name: record.event_name.clone(),
            start_time: record.start_time,
            duration: record.duration_ms(),
            success: record.success,
            message: record.message.clone(),
            data: record.data.clone(),
        }
    }
}
