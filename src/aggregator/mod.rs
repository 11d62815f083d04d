//! Windowed result aggregation
//!
//! [`ResultAggregator::buckets`] walks the time axis in steps of the report
//! period. Each step issues one grouped store query over the trailing window
//! `[end - window_size, end)` and yields a [`BucketWindow`]. The stream is
//! lazy: dropping it stops the walk and no further store queries happen.
//!
//! ```text
//!   from_time        t1        t2        t3
//!      |---------|---------|---------|-----> time
//!                 <------ window (smoothing = 2) ------>
//! ```

mod bucket;
mod query;

pub use bucket::{BucketWindow, StatBucket};
pub use query::AggregationQuery;

use futures::stream::{self, BoxStream, StreamExt};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::error::Result;
use crate::store::ResultStore;

/// Lazily evaluated sequence of bucket windows
pub type BucketStream = BoxStream<'static, Result<BucketWindow>>;

/// Position of the walk between two pulls
#[derive(Debug, Clone, Copy)]
enum Cursor {
    /// Bounds not yet read from the store
    Pending,
    At { next_end: i64, last_end: i64 },
    Done,
}

/// Computes bucketed statistics over a [`ResultStore`]
#[derive(Clone)]
pub struct ResultAggregator {
    store: Arc<dyn ResultStore>,
}

impl ResultAggregator {
    pub fn new(store: Arc<dyn ResultStore>) -> Self {
        Self { store }
    }

    /// Stream of bucket windows in increasing end time
    ///
    /// A data-consistency or store error is yielded once and ends the stream.
    pub fn buckets(&self, query: AggregationQuery) -> BucketStream {
        let store = Arc::clone(&self.store);
        debug!(
            "Aggregating from {} every {}ms over {}ms windows (chart_only={})",
            query.from_time(),
            query.report_period(),
            query.window_size(),
            query.chart_only()
        );
        Box::pin(stream::unfold(Cursor::Pending, move |cursor| {
            let store = Arc::clone(&store);
            async move { advance(store.as_ref(), &query, cursor).await }
        }))
    }

    /// Push-style adapter: feeds buckets to `callback` until it returns false
    ///
    /// Returns the number of bucket windows delivered.
    pub async fn for_each_bucket<F>(
        &self,
        query: AggregationQuery,
        mut callback: F,
    ) -> Result<usize>
    where
        F: FnMut(&BucketWindow) -> bool,
    {
        let mut buckets = self.buckets(query);
        let mut delivered = 0;
        while let Some(next) = buckets.next().await {
            let window = next?;
            delivered += 1;
            if !callback(&window) {
                break;
            }
        }
        Ok(delivered)
    }
}

async fn advance(
    store: &dyn ResultStore,
    query: &AggregationQuery,
    cursor: Cursor,
) -> Option<(Result<BucketWindow>, Cursor)> {
    let (next_end, last_end) = match cursor {
        Cursor::Done => return None,
        Cursor::At { next_end, last_end } => (next_end, last_end),
        Cursor::Pending => match store.time_bounds(query.chart_only()).await {
            Err(e) => return Some((Err(e.into()), Cursor::Done)),
            Ok(None) => {
                debug!("Result store is empty, no buckets to report");
                return None;
            }
            Ok(Some(bounds)) => query.plan(bounds)?,
        },
    };

    if next_end > last_end {
        return None;
    }

    let window = query.window_ending(next_end);
    let groups = match store.window_groups(window, query.chart_only()).await {
        Ok(groups) => groups,
        Err(e) => return Some((Err(e.into()), Cursor::Done)),
    };

    let next = match next_end.checked_add(query.report_period()) {
        Some(next_end) => Cursor::At { next_end, last_end },
        None => Cursor::Done,
    };

    match BucketWindow::from_groups(window, groups) {
        Ok(bucket) => {
            trace!(
                "Bucket ending {} holds {} event names",
                bucket.end_time(),
                bucket.entries.len()
            );
            Some((Ok(bucket), next))
        }
        Err(e) => Some((Err(e), Cursor::Done)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::ResultRecord;
    use crate::store::MemoryResultStore;

    async fn store_with(records: Vec<ResultRecord>) -> Arc<dyn ResultStore> {
        let store = MemoryResultStore::new();
        store.append(records).await.unwrap();
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_empty_store_yields_nothing() {
        let aggregator = ResultAggregator::new(Arc::new(MemoryResultStore::new()));
        let query = AggregationQuery::new(0, 1000, 1000, true).unwrap();
        let buckets: Vec<_> = aggregator.buckets(query).collect().await;
        assert!(buckets.is_empty());
    }

    #[tokio::test]
    async fn test_buckets_step_by_report_period() {
        let store = store_with(vec![
            ResultRecord::new("a", 100, 110, true),
            ResultRecord::new("a", 1_500, 1_530, false),
            ResultRecord::new("b", 2_100, 2_101, true),
        ])
        .await;
        let aggregator = ResultAggregator::new(store);
        let query = AggregationQuery::new(0, 1000, 1000, true).unwrap();

        let buckets: Vec<BucketWindow> = aggregator
            .buckets(query)
            .map(|b| b.unwrap())
            .collect()
            .await;

        let ends: Vec<i64> = buckets.iter().map(|b| b.end_time()).collect();
        assert_eq!(ends, vec![1_000, 2_000, 3_000]);
        assert_eq!(buckets[0].get("a").unwrap().count, 1);
        assert_eq!(buckets[1].get("a").unwrap().failure_count, 1);
        assert!(buckets[1].get("b").is_none());
        assert_eq!(buckets[2].get("b").unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_smoothing_widens_window() {
        let store = store_with(vec![
            ResultRecord::new("a", 500, 510, true),
            ResultRecord::new("a", 1_500, 1_510, true),
        ])
        .await;
        let aggregator = ResultAggregator::new(store);
        let query = AggregationQuery::with_smoothing(0, 1000, 2, true).unwrap();

        let buckets: Vec<BucketWindow> = aggregator
            .buckets(query)
            .map(|b| b.unwrap())
            .collect()
            .await;

        // windows [0,1000) [0,2000) [1000,3000); the walk ends after latest + window
        let counts: Vec<u64> = buckets
            .iter()
            .map(|b| b.get("a").map_or(0, |s| s.count))
            .collect();
        assert_eq!(counts, vec![1, 2, 1]);
        assert_eq!(buckets[1].get("a").unwrap().num_per_sec, 1.0);
    }

    #[tokio::test]
    async fn test_for_each_bucket_stops_on_false() {
        let records = (0..10)
            .map(|i| ResultRecord::new("a", i * 1000, i * 1000 + 5, true))
            .collect();
        let aggregator = ResultAggregator::new(store_with(records).await);
        let query = AggregationQuery::new(0, 1000, 1000, true).unwrap();

        let mut seen = Vec::new();
        let delivered = aggregator
            .for_each_bucket(query, |bucket| {
                seen.push(bucket.end_time());
                seen.len() < 3
            })
            .await
            .unwrap();
        assert_eq!(delivered, 3);
        assert_eq!(seen, vec![1_000, 2_000, 3_000]);
    }

    #[tokio::test]
    async fn test_chart_only_excludes_internal_events() {
        let store = store_with(vec![
            ResultRecord::new("raiseEvents", 0, 1, true).with_chart(false),
            ResultRecord::new("work", 10, 20, true),
        ])
        .await;
        let aggregator = ResultAggregator::new(store);

        let charted = AggregationQuery::new(0, 100, 100, true).unwrap();
        let first = aggregator.buckets(charted).next().await.unwrap().unwrap();
        assert!(first.get("raiseEvents").is_none());

        let everything = AggregationQuery::new(0, 100, 100, false).unwrap();
        let first = aggregator.buckets(everything).next().await.unwrap().unwrap();
        assert!(first.get("raiseEvents").is_some());
    }
}
