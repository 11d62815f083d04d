//! Result store contract

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::StorageResult;
use crate::results::{DescriptiveStats, EventResultFilter, ResultRecord};

/// Half-open interval `[from, to)` of epoch milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: i64,
    pub to: i64,
}

impl TimeWindow {
    pub fn new(from: i64, to: i64) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, time: i64) -> bool {
        time >= self.from && time < self.to
    }

    pub fn span_millis(&self) -> i64 {
        self.to - self.from
    }
}

/// Earliest and latest record start times held by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeBounds {
    pub earliest: i64,
    pub latest: i64,
}

/// Per-event-name statistics and failure counts for one window
///
/// Every name present in `stats` is expected to be present in `failures`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowGroups {
    pub stats: BTreeMap<String, DescriptiveStats>,
    pub failures: BTreeMap<String, u64>,
}

/// Paged query over individual records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailsQuery {
    pub filter: EventResultFilter,
    /// Restrict to one event name; `None` means all names
    pub event_name: Option<String>,
    pub skip: usize,
    pub limit: usize,
}

impl Default for DetailsQuery {
    fn default() -> Self {
        Self {
            filter: EventResultFilter::All,
            event_name: None,
            skip: 0,
            limit: 10,
        }
    }
}

/// Queryable, time-ordered store of [`ResultRecord`]s
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append records
    async fn append(&self, records: Vec<ResultRecord>) -> StorageResult<()>;

    /// Group the durations of records starting inside `window` by event name
    async fn window_groups(&self, window: TimeWindow, chart_only: bool)
        -> StorageResult<WindowGroups>;

    /// Distinct event names, sorted
    async fn event_names(&self) -> StorageResult<Vec<String>>;

    /// Individual records matching the query, in store order
    async fn event_details(&self, query: DetailsQuery) -> StorageResult<Vec<ResultRecord>>;

    /// Start-time bounds of the records, `None` when there are none
    async fn time_bounds(&self, chart_only: bool) -> StorageResult<Option<TimeBounds>>;
}
