//! Application configuration
//!
//! Settings that shape the process itself rather than a run.

/// Application configuration structure
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Verbosity level for logging
    pub verbose: u8,
    /// Filter directive from the configuration file or environment
    pub log_level_override: Option<String>,
}

impl AppConfig {
    pub fn new(verbose: u8) -> Self {
        Self {
            verbose,
            ..Default::default()
        }
    }

    pub fn with_log_level_override(mut self, level: Option<String>) -> Self {
        self.log_level_override = level;
        self
    }

    /// Get the log filter based on verbosity
    ///
    /// `-v` flags take precedence over a configured level.
    pub fn log_level(&self) -> String {
        match (self.verbose, &self.log_level_override) {
            (0, Some(level)) => level.clone(),
            (0, None) => "info".to_string(),
            (1, _) => "debug".to_string(),
            (2, _) => "trace".to_string(),
            _ => "trace,tokio=debug".to_string(),
        }
    }
}
