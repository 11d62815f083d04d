//! Pure record folding shared by the store backends
//!
//! Backends feed records one at a time, so a query never needs the whole
//! store in memory at once.

use super::traits::{DetailsQuery, TimeBounds, TimeWindow, WindowGroups};
use crate::results::{DescriptiveStats, ResultRecord};

/// Whether a record takes part in a query with the given chart filter
pub fn is_visible(record: &ResultRecord, chart_only: bool) -> bool {
    !chart_only || record.chart
}

/// Folds records into per-name statistics for one window
#[derive(Debug)]
pub struct WindowAccumulator {
    window: TimeWindow,
    chart_only: bool,
    groups: WindowGroups,
}

impl WindowAccumulator {
    pub fn new(window: TimeWindow, chart_only: bool) -> Self {
        Self {
            window,
            chart_only,
            groups: WindowGroups::default(),
        }
    }

    pub fn observe(&mut self, record: &ResultRecord) {
        if !is_visible(record, self.chart_only) || !self.window.contains(record.start_time) {
            return;
        }
        self.groups
            .stats
            .entry(record.event_name.clone())
            .or_insert_with(DescriptiveStats::new)
            .add(record.duration_ms() as f64);
        let failures = self
            .groups
            .failures
            .entry(record.event_name.clone())
            .or_insert(0);
        if !record.success {
            *failures += 1;
        }
    }

    pub fn finish(self) -> WindowGroups {
        self.groups
    }
}

/// Tracks the earliest and latest visible start times
#[derive(Debug)]
pub struct BoundsAccumulator {
    chart_only: bool,
    bounds: Option<TimeBounds>,
}

impl BoundsAccumulator {
    pub fn new(chart_only: bool) -> Self {
        Self {
            chart_only,
            bounds: None,
        }
    }

    pub fn observe(&mut self, record: &ResultRecord) {
        if !is_visible(record, self.chart_only) {
            return;
        }
        let time = record.start_time;
        self.bounds = Some(match self.bounds {
            None => TimeBounds {
                earliest: time,
                latest: time,
            },
            Some(b) => TimeBounds {
                earliest: b.earliest.min(time),
                latest: b.latest.max(time),
            },
        });
    }

    pub fn finish(self) -> Option<TimeBounds> {
        self.bounds
    }
}

/// Applies filter, skip and limit of a [`DetailsQuery`]
#[derive(Debug)]
pub struct DetailsPager {
    query: DetailsQuery,
    skipped: usize,
    page: Vec<ResultRecord>,
}

impl DetailsPager {
    pub fn new(query: DetailsQuery) -> Self {
        let capacity = query.limit.min(1024);
        Self {
            query,
            skipped: 0,
            page: Vec::with_capacity(capacity),
        }
    }

    /// Offer a record; returns true once the page is full
    pub fn observe(&mut self, record: &ResultRecord) -> bool {
        if self.is_full() {
            return true;
        }
        if !self.query.filter.matches(record) {
            return false;
        }
        if let Some(name) = &self.query.event_name {
            if &record.event_name != name {
                return false;
            }
        }
        if self.skipped < self.query.skip {
            self.skipped += 1;
            return false;
        }
        self.page.push(record.clone());
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.page.len() >= self.query.limit
    }

    pub fn finish(self) -> Vec<ResultRecord> {
        self.page
    }
}
