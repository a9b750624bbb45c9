//! Registry mapping analyzer names to instances.
//!
//! Registration happens once at process start; the registry is read-only
//! during an engine run. Registration order defines the default iteration
//! order, which in turn fixes the report's aggregation order.

use super::Analyzer;
use crate::error::ConfigError;
use std::sync::Arc;

#[derive(Default)]
pub struct AnalyzerRegistry {
    entries: Vec<Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an analyzer. Duplicate names fail fast: two checks claiming
    /// the same identifier is a configuration error, not something to
    /// recover from at runtime.
    pub fn register(&mut self, analyzer: Arc<dyn Analyzer>) -> Result<(), ConfigError> {
        if self.entries.iter().any(|a| a.name() == analyzer.name()) {
            return Err(ConfigError::DuplicateAnalyzer(analyzer.name().to_string()));
        }
        self.entries.push(analyzer);
        Ok(())
    }

    /// The analyzers matching the given name filter, in registration order.
    /// An empty filter selects everything. Matching is case-insensitive.
    pub fn selected(&self, filter: &[String]) -> Vec<Arc<dyn Analyzer>> {
        self.entries
            .iter()
            .filter(|analyzer| {
                filter.is_empty()
                    || filter
                        .iter()
                        .any(|name| name.eq_ignore_ascii_case(analyzer.name()))
            })
            .cloned()
            .collect()
    }

    /// All registered analyzer names, in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
