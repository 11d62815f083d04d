//! Event name to processor routing

use std::collections::HashMap;
use std::sync::Arc;

use crate::events::{Event, EventProcessor, EventResult};

/// Processors keyed by the event name they handle
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn EventProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `event_name` to `processor`, replacing any earlier registration
    pub fn register(
        &mut self,
        event_name: impl Into<String>,
        processor: Arc<dyn EventProcessor>,
    ) -> &mut Self {
        self.processors.insert(event_name.into(), processor);
        self
    }

    pub fn get(&self, event_name: &str) -> Option<&Arc<dyn EventProcessor>> {
        self.processors.get(event_name)
    }

    pub fn contains(&self, event_name: &str) -> bool {
        self.processors.contains_key(event_name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.processors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

/// Accepts any event and schedules nothing further
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProcessor;

impl EventProcessor for NoopProcessor {
    fn process_event(&self, event: &Event) -> EventResult {
        EventResult::success(format!("Processed {}.", event.name()), Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_lookup() {
        let mut registry = ProcessorRegistry::new();
        registry
            .register("b", Arc::new(NoopProcessor))
            .register("a", Arc::new(NoopProcessor));
        assert!(registry.contains("a"));
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.names(), vec!["a", "b"]);
    }

    #[test]
    fn test_noop_is_terminal() {
        let result = NoopProcessor.process_event(&Event::empty("work", 1));
        assert!(result.is_terminal());
        assert_eq!(result.message(), "Processed work.");
    }
}
