//! Query surface over stored results
//!
//! Turns loosely typed request parameters into validated aggregation
//! queries and shapes the results into the rows a dashboard consumes. The
//! transport binding (HTTP, CLI) lives outside this module.

mod time_unit;

pub use time_unit::TimeUnit;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, enabled, Level};

use crate::aggregator::{AggregationQuery, ResultAggregator, StatBucket};
use crate::error::{LoadgridError, Result};
use crate::results::{EventDetails, EventResultFilter};
use crate::store::{DetailsQuery, ResultStore};

/// Pseudo event name meaning "no name filter"
pub const ALL_EVENT_NAMES: &str = "(All Events)";

/// Outbound payloads at least this long are logged head and tail only
const OUTBOUND_LOG_LIMIT: usize = 500;
const OUTBOUND_LOG_EDGE: usize = 250;

/// Raw time-series request parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeSeriesParams {
    /// Epoch ms the series starts from
    pub from_time: i64,
    /// Unit of `report_period`, any case
    pub time_unit: String,
    pub report_period: i64,
    /// Report periods per smoothing window
    pub smoothing: i64,
    pub chart_only: bool,
}

impl Default for TimeSeriesParams {
    fn default() -> Self {
        Self {
            from_time: 0,
            time_unit: TimeUnit::default().to_string(),
            report_period: 1,
            smoothing: 1,
            chart_only: true,
        }
    }
}

impl TimeSeriesParams {
    /// Validate and convert to an [`AggregationQuery`]
    pub fn to_query(&self) -> Result<AggregationQuery> {
        if self.report_period < 1 {
            return Err(LoadgridError::invalid_argument(
                "reportPeriod",
                "'reportPeriod' must be 1 or more.",
            ));
        }
        if self.smoothing < 1 {
            return Err(LoadgridError::invalid_argument(
                "smoothing",
                "'smoothing' must be 1 or more.",
            ));
        }
        let unit: TimeUnit = self.time_unit.parse()?;
        let report_period_ms = unit.to_millis(self.report_period).ok_or_else(|| {
            LoadgridError::invalid_argument("reportPeriod", "report period overflows")
        })?;
        if report_period_ms < 1 {
            return Err(LoadgridError::invalid_argument(
                "reportPeriod",
                format!(
                    "{} {} is shorter than one millisecond",
                    self.report_period, unit
                ),
            ));
        }
        AggregationQuery::with_smoothing(
            self.from_time,
            report_period_ms,
            self.smoothing,
            self.chart_only,
        )
    }
}

/// One time-series row as served to charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesRow {
    pub time: i64,
    pub name: String,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub num: u64,
    pub num_per_sec: f64,
    pub fail: u64,
    pub fail_per_sec: f64,
}

impl From<StatBucket> for TimeSeriesRow {
    fn from(bucket: StatBucket) -> Self {
        Self {
            time: bucket.bucket_end_time,
            name: bucket.event_name,
            mean: bucket.mean,
            min: bucket.min,
            max: bucket.max,
            std_dev: bucket.std_dev,
            num: bucket.count,
            num_per_sec: bucket.num_per_sec,
            fail: bucket.failure_count,
            fail_per_sec: bucket.failures_per_sec,
        }
    }
}

/// Result queries for one store
#[derive(Clone)]
pub struct QueryService {
    store: Arc<dyn ResultStore>,
    aggregator: ResultAggregator,
}

impl QueryService {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        let aggregator = ResultAggregator::new(Arc::clone(&store));
        Self { store, aggregator }
    }

    pub fn aggregator(&self) -> &ResultAggregator {
        &self.aggregator
    }

    /// Smoothed per-name statistics for every bucket
    pub async fn time_series(&self, params: &TimeSeriesParams) -> Result<Vec<TimeSeriesRow>> {
        debug!("Inbound: {:?}", params);
        let query = params.to_query()?;

        let mut buckets = self.aggregator.buckets(query);
        let mut rows = Vec::new();
        while let Some(window) = buckets.next().await {
            rows.extend(window?.entries.into_iter().map(TimeSeriesRow::from));
        }

        log_outbound(&rows);
        Ok(rows)
    }

    /// Distinct event names, led by [`ALL_EVENT_NAMES`]
    pub async fn event_names(&self) -> Result<Vec<String>> {
        let mut names = all_events_filter_name();
        names.extend(self.store.event_names().await?);
        Ok(names)
    }

    /// Page of individual results
    ///
    /// `name_filter` equal to [`ALL_EVENT_NAMES`] or empty selects every name.
    pub async fn event_results(
        &self,
        filter: EventResultFilter,
        name_filter: &str,
        skip: usize,
        limit: usize,
    ) -> Result<Vec<EventDetails>> {
        debug!(
            "Inbound: [filterEventName:{},filterSuccess:{},skip:{},limit:{}]",
            name_filter, filter, skip, limit
        );
        let event_name = if name_filter.is_empty() || name_filter == ALL_EVENT_NAMES {
            None
        } else {
            Some(name_filter.to_string())
        };
        let records = self
            .store
            .event_details(DetailsQuery {
                filter,
                event_name,
                skip,
                limit,
            })
            .await?;
        Ok(records.iter().map(EventDetails::from).collect())
    }
}

/// The single-entry list naming the "all events" filter
pub fn all_events_filter_name() -> Vec<String> {
    vec![ALL_EVENT_NAMES.to_string()]
}

fn log_outbound<T: Serialize>(payload: &T) {
    if !enabled!(Level::DEBUG) {
        return;
    }
    match serde_json::to_string(payload) {
        Ok(json) => debug!("Outbound: {}", outbound_preview(&json)),
        Err(e) => debug!("Outbound payload not serializable: {}", e),
    }
}

/// Whole payload when short, otherwise its first and last characters
fn outbound_preview(json: &str) -> Cow<'_, str> {
    let len = json.chars().count();
    if len < OUTBOUND_LOG_LIMIT {
        return Cow::Borrowed(json);
    }
    let head: String = json.chars().take(OUTBOUND_LOG_EDGE).collect();
    let tail: String = json.chars().skip(len - OUTBOUND_LOG_EDGE).collect();
    Cow::Owned(format!("{head} ... {tail}"))
}
