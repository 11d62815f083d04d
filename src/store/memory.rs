//! In-memory result store for tests and single-process runs

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::StorageResult;
use super::grouping::{BoundsAccumulator, DetailsPager, WindowAccumulator};
use super::traits::{DetailsQuery, ResultStore, TimeBounds, TimeWindow, WindowGroups};
use crate::results::ResultRecord;

/// Keeps records ordered by start time
#[derive(Debug, Clone, Default)]
pub struct MemoryResultStore {
    records: Arc<RwLock<Vec<ResultRecord>>>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn append(&self, records: Vec<ResultRecord>) -> StorageResult<()> {
        let mut held = self.records.write().await;
        for record in records {
            // after any equal start times, so arrival order is kept
            let at = held.partition_point(|r| r.start_time <= record.start_time);
            held.insert(at, record);
        }
        Ok(())
    }

    async fn window_groups(
        &self,
        window: TimeWindow,
        chart_only: bool,
    ) -> StorageResult<WindowGroups> {
        let held = self.records.read().await;
        let first = held.partition_point(|r| r.start_time < window.from);
        let mut acc = WindowAccumulator::new(window, chart_only);
        for record in held[first..].iter().take_while(|r| r.start_time < window.to) {
            acc.observe(record);
        }
        Ok(acc.finish())
    }

    async fn event_names(&self) -> StorageResult<Vec<String>> {
        let held = self.records.read().await;
        let names: BTreeSet<&str> = held.iter().map(|r| r.event_name.as_str()).collect();
        Ok(names.into_iter().map(str::to_string).collect())
    }

    async fn event_details(&self, query: DetailsQuery) -> StorageResult<Vec<ResultRecord>> {
        let held = self.records.read().await;
        let mut pager = DetailsPager::new(query);
        for record in held.iter() {
            if pager.observe(record) {
                break;
            }
        }
        Ok(pager.finish())
    }

    async fn time_bounds(&self, chart_only: bool) -> StorageResult<Option<TimeBounds>> {
        let held = self.records.read().await;
        let mut acc = BoundsAccumulator::new(chart_only);
        for record in held.iter() {
            acc.observe(record);
        }
        Ok(acc.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::EventResultFilter;

    async fn seeded() -> MemoryResultStore {
        let store = MemoryResultStore::new();
        store
            .append(vec![
                ResultRecord::new("b", 300, 310, true),
                ResultRecord::new("a", 100, 105, true),
                ResultRecord::new("a", 200, 230, false),
                ResultRecord::new("raiseEvents", 100, 100, true).with_chart(false),
            ])
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_append_keeps_time_order() {
        let store = seeded().await;
        let all = store
            .event_details(DetailsQuery {
                limit: 100,
                ..Default::default()
            })
            .await
            .unwrap();
        let starts: Vec<i64> = all.iter().map(|r| r.start_time).collect();
        assert_eq!(starts, vec![100, 100, 200, 300]);
        assert_eq!(store.len().await, 4);
    }

    #[tokio::test]
    async fn test_window_groups_respect_bounds() {
        let store = seeded().await;
        let groups = store
            .window_groups(TimeWindow::new(100, 300), true)
            .await
            .unwrap();
        assert_eq!(groups.stats.keys().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(groups.stats["a"].count(), 2);
        assert_eq!(groups.failures["a"], 1);
    }

    #[tokio::test]
    async fn test_event_names_are_distinct_and_sorted() {
        let store = seeded().await;
        assert_eq!(
            store.event_names().await.unwrap(),
            vec!["a", "b", "raiseEvents"]
        );
    }

    #[tokio::test]
    async fn test_time_bounds_honour_chart_flag() {
        let store = seeded().await;
        let bounds = store.time_bounds(true).await.unwrap().unwrap();
        assert_eq!((bounds.earliest, bounds.latest), (100, 300));
        assert!(MemoryResultStore::new().time_bounds(true).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_details_only() {
        let store = seeded().await;
        let failed = store
            .event_details(DetailsQuery {
                filter: EventResultFilter::Failed,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].start_time, 200);
    }
}
