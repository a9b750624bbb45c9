//! Engine orchestration: run the selected analyzers and aggregate a report.
//!
//! Analyzers are independent and side-effect-free with respect to each
//! other (each only reads from the shared cluster client), so the engine
//! fans them out over a bounded worker pool. Aggregation order is fixed by
//! registration index, never by completion order, so identical inputs
//! always produce an identically ordered report.

use super::types::{AnalyzerError, Report};
use super::Analyzer;
use crate::cluster::{ClusterError, ClusterReader};
use crate::common::cancel::CancelToken;
use futures_util::stream::{self, StreamExt};
use std::sync::Arc;
use thiserror::Error;

/// Upper bound on analyzers running at once.
const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// The run was cancelled before every analyzer completed. Carries the
/// report accumulated so far; analyzers that had not finished appear in
/// neither `findings` nor `errors`.
#[derive(Debug, Error)]
#[error("analysis cancelled before all analyzers completed")]
pub struct Cancelled {
    pub partial: Report,
}

pub struct Engine {
    cluster: Arc<dyn ClusterReader>,
    max_concurrency: usize,
}

impl Engine {
    pub fn new(cluster: Arc<dyn ClusterReader>) -> Self {
        Self {
            cluster,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Run the selected analyzers against the cluster and aggregate their
    /// outcomes.
    ///
    /// An analyzer returning `Err` contributes one entry to `Report.errors`
    /// and does not abort its siblings or drop their findings. There are no
    /// retries at this layer.
    ///
    /// On cancellation, in-flight analyzers are dropped promptly and the
    /// partial report is returned inside [`Cancelled`].
    pub async fn run(
        &self,
        analyzers: &[Arc<dyn Analyzer>],
        namespace: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<Report, Cancelled> {
        let mut slots: Vec<Option<Outcome>> = (0..analyzers.len()).map(|_| None).collect();

        let jobs = analyzers.iter().cloned().enumerate().map(|(index, analyzer)| {
            let cluster = Arc::clone(&self.cluster);
            let namespace = namespace.map(str::to_string);
            async move {
                log::debug!("running analyzer {}", analyzer.name());
                let result = analyzer.analyze(cluster.as_ref(), namespace.as_deref()).await;
                (index, analyzer.name(), result)
            }
        });
        let mut completions = stream::iter(jobs).buffer_unordered(self.max_concurrency);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    drop(completions);
                    return Err(Cancelled {
                        partial: assemble(slots),
                    });
                }
                next = completions.next() => match next {
                    Some((index, name, result)) => {
                        slots[index] = Some(Outcome { name, result });
                    }
                    None => break,
                }
            }
        }

        Ok(assemble(slots))
    }
}

struct Outcome {
    name: &'static str,
    result: Result<Vec<super::Finding>, ClusterError>,
}

/// Fold completed outcomes into a report, in registration-index order.
fn assemble(slots: Vec<Option<Outcome>>) -> Report {
    let mut report = Report::default();
    for outcome in slots.into_iter().flatten() {
        match outcome.result {
            Ok(findings) => report.findings.extend(findings),
            Err(err) => {
                log::warn!("analyzer {} failed: {}", outcome.name, err);
                report.errors.push(AnalyzerError {
                    analyzer: outcome.name.to_string(),
                    message: err.to_string(),
                });
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Failure, Finding};
    use crate::cluster::fake::FakeCluster;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Test analyzer that emits canned findings after an optional delay.
    struct Stub {
        name: &'static str,
        delay: Duration,
        outcome: Result<Vec<Finding>, String>,
    }

    impl Stub {
        fn emitting(name: &'static str, findings: Vec<Finding>) -> Arc<dyn Analyzer> {
            Arc::new(Self {
                name,
                delay: Duration::ZERO,
                outcome: Ok(findings),
            })
        }

        fn slow(name: &'static str, delay: Duration, findings: Vec<Finding>) -> Arc<dyn Analyzer> {
            Arc::new(Self {
                name,
                delay,
                outcome: Ok(findings),
            })
        }

        fn failing(name: &'static str, message: &str) -> Arc<dyn Analyzer> {
            Arc::new(Self {
                name,
                delay: Duration::ZERO,
                outcome: Err(message.to_string()),
            })
        }
    }

    #[async_trait]
    impl Analyzer for Stub {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn analyze(
            &self,
            _cluster: &dyn ClusterReader,
            _namespace: Option<&str>,
        ) -> Result<Vec<Finding>, ClusterError> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            match &self.outcome {
                Ok(findings) => Ok(findings.clone()),
                Err(message) => Err(ClusterError::ApiError(message.clone())),
            }
        }
    }

    fn finding(kind: &str, name: &str) -> Finding {
        Finding::new(kind, name, "default", vec![Failure::new("broken")])
    }

    fn engine() -> Engine {
        Engine::new(Arc::new(FakeCluster::new()))
    }

    #[tokio::test]
    async fn clean_run_yields_empty_report() {
        let analyzers = vec![Stub::emitting("Pod", vec![]), Stub::emitting("Service", vec![])];
        let report = engine()
            .run(&analyzers, None, &CancelToken::never())
            .await
            .unwrap();
        assert!(report.is_clean());
    }

    #[tokio::test]
    async fn failing_analyzer_does_not_suppress_siblings() {
        let analyzers = vec![
            Stub::emitting("Pod", vec![finding("Pod", "web")]),
            Stub::failing("Service", "list blew up"),
            Stub::emitting("Ingress", vec![finding("Ingress", "edge")]),
        ];
        let report = engine()
            .run(&analyzers, None, &CancelToken::never())
            .await
            .unwrap();

        assert_eq!(report.findings.len(), 2);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].analyzer, "Service");
        assert!(report.errors[0].message.contains("list blew up"));
    }

    #[tokio::test]
    async fn aggregation_follows_registration_order_not_completion_order() {
        // The first-registered analyzer finishes last; its findings must
        // still come first.
        let analyzers = vec![
            Stub::slow("Pod", Duration::from_millis(50), vec![finding("Pod", "web")]),
            Stub::emitting("Service", vec![finding("Service", "api")]),
        ];
        let report = engine()
            .run(&analyzers, None, &CancelToken::never())
            .await
            .unwrap();

        let kinds: Vec<_> = report.findings.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, vec!["Pod", "Service"]);
    }

    #[tokio::test]
    async fn cancellation_returns_partial_report() {
        let analyzers = vec![
            Stub::emitting("Pod", vec![finding("Pod", "web")]),
            Stub::slow(
                "Service",
                Duration::from_secs(3600),
                vec![finding("Service", "api")],
            ),
        ];
        let (handle, token) = CancelToken::new();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            handle.cancel();
        });

        let err = engine().run(&analyzers, None, &token).await.unwrap_err();
        let kinds: Vec<_> = err.partial.findings.iter().map(|f| f.kind.as_str()).collect();
        assert_eq!(kinds, vec!["Pod"]);
    }

    #[tokio::test]
    async fn identical_inputs_produce_identical_reports() {
        let make = || {
            vec![
                Stub::emitting("Pod", vec![finding("Pod", "a"), finding("Pod", "b")]),
                Stub::failing("Service", "boom"),
                Stub::emitting("Ingress", vec![finding("Ingress", "edge")]),
            ]
        };
        let first = engine()
            .run(&make(), None, &CancelToken::never())
            .await
            .unwrap();
        let second = engine()
            .run(&make(), None, &CancelToken::never())
            .await
            .unwrap();
        assert_eq!(first, second);
    }
}
