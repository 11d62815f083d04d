//! Validated aggregation parameters

use crate::error::{LoadgridError, Result};
use crate::store::{TimeBounds, TimeWindow};

/// Parameters of one bucket sequence, all in milliseconds
///
/// Invariants: `report_period >= 1` and `window_size >= report_period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationQuery {
    from_time: i64,
    report_period: i64,
    window_size: i64,
    chart_only: bool,
    until: Option<i64>,
}

impl AggregationQuery {
    pub fn new(
        from_time: i64,
        report_period: i64,
        window_size: i64,
        chart_only: bool,
    ) -> Result<Self> {
        if report_period < 1 {
            return Err(LoadgridError::invalid_argument(
                "reportPeriod",
                "'reportPeriod' must be 1 or more.",
            ));
        }
        if window_size < report_period {
            return Err(LoadgridError::invalid_argument(
                "windowSize",
                format!(
                    "window size {window_size}ms is smaller than the report period \
                     {report_period}ms"
                ),
            ));
        }
        Ok(Self {
            from_time,
            report_period,
            window_size,
            chart_only,
            until: None,
        })
    }

    /// Window size expressed as a whole number of report periods
    pub fn with_smoothing(
        from_time: i64,
        report_period: i64,
        smoothing: i64,
        chart_only: bool,
    ) -> Result<Self> {
        if smoothing < 1 {
            return Err(LoadgridError::invalid_argument(
                "smoothing",
                "'smoothing' must be 1 or more.",
            ));
        }
        let window_size = report_period.checked_mul(smoothing).ok_or_else(|| {
            LoadgridError::invalid_argument("smoothing", "window size overflows")
        })?;
        Self::new(from_time, report_period, window_size, chart_only)
    }

    /// Stop after the bucket ending at or before `until`
    pub fn with_until(mut self, until: i64) -> Self {
        self.until = Some(until);
        self
    }

    pub fn from_time(&self) -> i64 {
        self.from_time
    }

    pub fn report_period(&self) -> i64 {
        self.report_period
    }

    pub fn window_size(&self) -> i64 {
        self.window_size
    }

    pub fn chart_only(&self) -> bool {
        self.chart_only
    }

    pub fn until(&self) -> Option<i64> {
        self.until
    }

    /// Number of report periods per window, rounded down
    pub fn smoothing(&self) -> i64 {
        self.window_size / self.report_period
    }

    /// First and last bucket end times for a store holding `bounds`
    ///
    /// The sequence starts on the `from_time` grid at the period holding the
    /// earliest record and ends once a window can no longer reach the latest
    /// one. `None` when no record lies at or after `from_time`.
    pub(crate) fn plan(&self, bounds: TimeBounds) -> Option<(i64, i64)> {
        if bounds.latest < self.from_time {
            return None;
        }
        let start = if bounds.earliest > self.from_time {
            let offset = bounds.earliest.saturating_sub(self.from_time);
            self.from_time + (offset / self.report_period) * self.report_period
        } else {
            self.from_time
        };
        let first_end = start.checked_add(self.report_period)?;
        let last_end = bounds
            .latest
            .saturating_add(self.window_size)
            .min(self.until.unwrap_or(i64::MAX));
        Some((first_end, last_end))
    }

    /// Trailing window for the bucket ending at `end`, never reaching before `from_time`
    pub(crate) fn window_ending(&self, end: i64) -> TimeWindow {
        let from = end.saturating_sub(self.window_size).max(self.from_time);
        TimeWindow::new(from, end)
    }
}
