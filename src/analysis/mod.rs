//! The diagnostic analysis engine.
//!
//! An [`Analyzer`] is one diagnostic check bound to one resource kind.
//! The [`registry::AnalyzerRegistry`] maps names to analyzers and drives
//! selection; the [`engine::Engine`] runs the selected set concurrently
//! and aggregates per-analyzer outcomes into a [`Report`], isolating
//! individual failures so one broken check never sinks the run.

pub mod engine;
pub mod registry;
pub mod types;

pub use engine::{Cancelled, Engine};
pub use registry::AnalyzerRegistry;
pub use types::{AnalyzerError, Failure, Finding, Report, Sensitive};

use crate::cluster::{ClusterError, ClusterReader};
use async_trait::async_trait;

/// One diagnostic check, bound to exactly one resource kind.
///
/// Implementations list candidate resources through the injected cluster
/// reader, apply kind-specific validation rules, and emit one [`Finding`]
/// per resource with at least one problem. A resource with several
/// simultaneous problems yields one finding carrying several failures.
///
/// `Err` is reserved for conditions that make the whole check meaningless
/// (the list call itself failed); a single resource's validation outcome is
/// never an analyzer error.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Stable identifier, used in selection filters and reports.
    fn name(&self) -> &'static str;

    async fn analyze(
        &self,
        cluster: &dyn ClusterReader,
        namespace: Option<&str>,
    ) -> Result<Vec<Finding>, ClusterError>;
}
