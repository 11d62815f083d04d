//! Application configuration
//!
//! A single file (TOML, YAML or JSON, chosen by extension) with optional
//! `[scheduler]`, `[query]` and `[store]` sections. Environment variables
//! override the file:
//!
//! | Variable             | Overrides                                  |
//! |----------------------|--------------------------------------------|
//! | `LOADGRID_LOG_LEVEL` | `log_level`                                |
//! | `LOADGRID_STORE`     | `[store]`; `memory` or a JSONL file path   |

mod loader;

pub use loader::{load_config, load_or_default, parse_config, ConfigFormat};

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, LoadgridError, Result};
use crate::query::TimeSeriesParams;
use crate::scheduler::SchedulerConfig;
use crate::store::StoreConfig;

pub const ENV_LOG_LEVEL: &str = "LOADGRID_LOG_LEVEL";
pub const ENV_STORE: &str = "LOADGRID_STORE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadgridConfig {
    /// `tracing` filter directive; the `-v` flags win when given
    pub log_level: Option<String>,
    pub scheduler: Option<SchedulerConfig>,
    /// Defaults for time-series queries
    pub query: TimeSeriesParams,
    pub store: StoreConfig,
}

impl LoadgridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply overrides from the process environment
    pub fn merge_env_vars(&mut self) {
        self.merge_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`
    pub fn merge_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup(ENV_LOG_LEVEL).filter(|v| !v.trim().is_empty()) {
            self.log_level = Some(level);
        }
        if let Some(store) = lookup(ENV_STORE).filter(|v| !v.trim().is_empty()) {
            self.store = StoreConfig::from_override(store.trim());
        }
    }

    /// Check every section
    pub fn validate(&self) -> Result<()> {
        if let Some(scheduler) = &self.scheduler {
            scheduler.validate()?;
        }
        self.query.to_query().map_err(|e| {
            LoadgridError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("[query] {}", e.user_message()),
            )
        })?;
        self.store.validate().map_err(|e| {
            LoadgridError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("[store] {e}"),
            )
        })?;
        Ok(())
    }

    /// The `[scheduler]` section, required by commands that schedule events
    pub fn require_scheduler(&self) -> Result<&SchedulerConfig> {
        self.scheduler.as_ref().ok_or_else(|| {
            LoadgridError::config_with_code(
                ErrorCode::CONFIG_MISSING_REQUIRED,
                "missing [scheduler] section",
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BackendType;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = LoadgridConfig::new();
        assert!(config.validate().is_ok());
        assert!(config.scheduler.is_none());
        assert_eq!(config.store.backend, BackendType::File);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = LoadgridConfig::new();
        config.merge_env_from(env(&[(ENV_LOG_LEVEL, "debug"), (ENV_STORE, "memory")]));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.store.backend, BackendType::Memory);

        config.merge_env_from(env(&[(ENV_STORE, " ")]));
        assert_eq!(config.store.backend, BackendType::Memory);
    }

    #[test]
    fn test_invalid_query_defaults_are_config_errors() {
        let mut config = LoadgridConfig::new();
        config.query.smoothing = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_VALUE);
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_missing_scheduler_section() {
        let err = LoadgridConfig::new().require_scheduler().unwrap_err();
        assert_eq!(err.code(), ErrorCode::CONFIG_MISSING_REQUIRED);
    }
}
