//! Per-window output rows

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::error::{LoadgridError, Result};
use crate::store::{TimeWindow, WindowGroups};

/// Statistics of one event name over one trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBucket {
    pub bucket_end_time: i64,
    pub window_start: i64,
    pub event_name: String,
    pub count: u64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub success_count: u64,
    pub failure_count: u64,
    pub num_per_sec: f64,
    pub failures_per_sec: f64,
}

/// All buckets sharing one window, ordered by event name
#[derive(Debug, Clone, PartialEq)]
pub struct BucketWindow {
    pub window: TimeWindow,
    pub entries: Vec<StatBucket>,
}

impl BucketWindow {
    /// Turn grouped store output into buckets
    ///
    /// Fails when a name has statistics but no failure count.
    pub fn from_groups(window: TimeWindow, groups: WindowGroups) -> Result<Self> {
        let seconds = window.span_millis() as f64 / 1000.0;
        let mut entries = Vec::with_capacity(groups.stats.len());

        for (event_name, stats) in groups.stats {
            if stats.is_empty() {
                continue;
            }
            let Some(&failures) = groups.failures.get(&event_name) else {
                error!(
                    "Found no failure count for '{}' in window [{}, {})",
                    event_name, window.from, window.to
                );
                return Err(LoadgridError::data_consistency(format!(
                    "no failure count for event '{}' in window ending {}",
                    event_name, window.to
                )));
            };
            let count = stats.count();
            entries.push(StatBucket {
                bucket_end_time: window.to,
                window_start: window.from,
                event_name,
                count,
                mean: stats.mean(),
                min: stats.min(),
                max: stats.max(),
                std_dev: stats.std_dev(),
                success_count: count.saturating_sub(failures),
                failure_count: failures,
                num_per_sec: count as f64 / seconds,
                failures_per_sec: failures as f64 / seconds,
            });
        }

        Ok(Self { window, entries })
    }

    pub fn end_time(&self) -> i64 {
        self.window.to
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, event_name: &str) -> Option<&StatBucket> {
        self.entries.iter().find(|b| b.event_name == event_name)
    }
}
