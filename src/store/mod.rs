//! Result store abstraction
//!
//! The aggregator and query surface only see [`ResultStore`]. Two backends
//! ship with the crate: [`MemoryResultStore`] for tests and single-process
//! runs, and [`JsonlResultStore`] for runs whose results must outlive the
//! process.

pub mod error;
mod file;
pub mod grouping;
mod memory;
mod traits;

pub use error::{StorageError, StorageResult};
pub use file::JsonlResultStore;
pub use memory::MemoryResultStore;
pub use traits::{DetailsQuery, ResultStore, TimeBounds, TimeWindow, WindowGroups};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Default JSONL file when no path is configured
pub const DEFAULT_STORE_PATH: &str = "loadgrid-results.jsonl";

/// Store backend type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// JSON Lines file (default)
    #[default]
    File,
    /// Process memory
    Memory,
}

/// `[store]` configuration section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendType,
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendType::File,
            path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self {
            backend: BackendType::Memory,
            ..Default::default()
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendType::File,
            path: path.into(),
        }
    }

    /// Interpret an override value: `memory` selects the memory backend,
    /// anything else is a JSONL path
    pub fn from_override(value: &str) -> Self {
        if value.eq_ignore_ascii_case("memory") {
            Self::memory()
        } else {
            Self::file(value)
        }
    }

    pub fn validate(&self) -> StorageResult<()> {
        if self.backend == BackendType::File && self.path.as_os_str().is_empty() {
            return Err(StorageError::configuration(
                "file store requires a non-empty path",
            ));
        }
        Ok(())
    }
}

/// Open the store described by `config`
pub fn open_store(config: &StoreConfig) -> StorageResult<Arc<dyn ResultStore>> {
    config.validate()?;
    match config.backend {
        BackendType::File => {
            debug!("Opening JSONL result store at {}", config.path.display());
            Ok(Arc::new(JsonlResultStore::new(config.path.clone())))
        }
        BackendType::Memory => {
            debug!("Opening in-memory result store");
            Ok(Arc::new(MemoryResultStore::new()))
        }
    }
}
