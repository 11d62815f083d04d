//! Append-only JSON Lines result store
//!
//! One [`ResultRecord`] per line. Queries scan the file front to back and
//! fold records through the accumulators in [`super::grouping`]; lines that
//! fail to parse are logged and skipped.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::error::StorageResult;
use super::grouping::{BoundsAccumulator, DetailsPager, WindowAccumulator};
use super::traits::{DetailsQuery, ResultStore, TimeBounds, TimeWindow, WindowGroups};
use crate::results::ResultRecord;

/// File-backed result store
///
/// There is no index: every query reads the whole file. A time series of
/// `n` buckets therefore costs `n + 1` full scans, which suits local runs
/// and small result sets. Use [`super::MemoryResultStore`] or an external
/// store for large ones.
#[derive(Debug)]
pub struct JsonlResultStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonlResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Feed every parseable record to `visit` until it returns false
    async fn scan<F>(&self, mut visit: F) -> StorageResult<()>
    where
        F: FnMut(&ResultRecord) -> bool,
    {
        if !fs::try_exists(&self.path).await? {
            return Ok(());
        }

        let file = File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();
        let mut line_number = 0usize;

        while let Some(line) = lines.next_line().await? {
            line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ResultRecord>(&line) {
                Ok(record) => {
                    if !visit(&record) {
                        break;
                    }
                }
                Err(e) => warn!(
                    "Failed to parse result line {} in {}: {}",
                    line_number,
                    self.path.display(),
                    e
                ),
            }
        }

        Ok(())
    }
}

#[async_trait]
impl ResultStore for JsonlResultStore {
    async fn append(&self, records: Vec<ResultRecord>) -> StorageResult<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut buffer = Vec::new();
        for record in &records {
            serde_json::to_writer(&mut buffer, record)?;
            buffer.push(b'\n');
        }

        let _guard = self.write_lock.lock().await;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&buffer).await?;
        file.flush().await?;

        debug!(
            "Appended {} result records to {}",
            records.len(),
            self.path.display()
        );
        Ok(())
    }

    async fn window_groups(
        &self,
        window: TimeWindow,
        chart_only: bool,
    ) -> StorageResult<WindowGroups> {
        let mut acc = WindowAccumulator::new(window, chart_only);
        self.scan(|record| {
            acc.observe(record);
            true
        })
        .await?;
        Ok(acc.finish())
    }

    async fn event_names(&self) -> StorageResult<Vec<String>> {
        let mut names = BTreeSet::new();
        self.scan(|record| {
            if !names.contains(&record.event_name) {
                names.insert(record.event_name.clone());
            }
            true
        })
        .await?;
        Ok(names.into_iter().collect())
    }

    async fn event_details(&self, query: DetailsQuery) -> StorageResult<Vec<ResultRecord>> {
        let mut pager = DetailsPager::new(query);
        if pager.is_full() {
            return Ok(pager.finish());
        }
        self.scan(|record| !pager.observe(record)).await?;
        Ok(pager.finish())
    }

    async fn time_bounds(&self, chart_only: bool) -> StorageResult<Option<TimeBounds>> {
        let mut acc = BoundsAccumulator::new(chart_only);
        self.scan(|record| {
            acc.observe(record);
            true
        })
        .await?;
        Ok(acc.finish())
    }
}
