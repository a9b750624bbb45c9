//! Service analyzer: Endpoints objects with nothing ready behind them.
//!
//! Selector labels and pod names are cluster-internal identifiers, so they
//! are recorded as sensitive values and masked before any failure text is
//! forwarded to the AI backend.

use crate::analysis::{Analyzer, Failure, Finding, Sensitive};
use crate::cluster::{ClusterError, ClusterReader};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Endpoints;

pub struct ServiceAnalyzer;

#[async_trait]
impl Analyzer for ServiceAnalyzer {
    fn name(&self) -> &'static str {
        "Service"
    }

    async fn analyze(
        &self,
        cluster: &dyn ClusterReader,
        namespace: Option<&str>,
    ) -> Result<Vec<Finding>, ClusterError> {
        let endpoints = cluster.list_endpoints(namespace).await?;

        let mut findings = Vec::new();
        for endpoint in endpoints {
            let name = endpoint.metadata.name.clone().unwrap_or_default();
            let ns = endpoint.metadata.namespace.clone().unwrap_or_default();
            let mut failures = Vec::new();

            if has_no_subsets(&endpoint) {
                // Nothing matched the selector at all; point at the owning
                // Service's label expectations.
                let Some(service) = cluster.get_service(&ns, &name).await? else {
                    continue;
                };
                let selector = service.spec.and_then(|spec| spec.selector);
                for (label, value) in selector.iter().flatten() {
                    failures.push(Failure::with_sensitive(
                        format!("Service has no endpoints, expected label {}={}", label, value),
                        vec![Sensitive::new(label.clone()), Sensitive::new(value.clone())],
                    ));
                }
            } else {
                failures.extend(not_ready_failures(&endpoint));
            }

            if !failures.is_empty() {
                findings.push(Finding::new(self.name(), name, ns, failures));
            }
        }
        Ok(findings)
    }
}

fn has_no_subsets(endpoint: &Endpoints) -> bool {
    endpoint
        .subsets
        .as_ref()
        .map_or(true, |subsets| subsets.is_empty())
}

/// Subsets where every address is still not ready.
fn not_ready_failures(endpoint: &Endpoints) -> Vec<Failure> {
    let mut failures = Vec::new();
    for subset in endpoint.subsets.iter().flatten() {
        let ready = subset.addresses.as_ref().map_or(0, Vec::len);
        let not_ready: Vec<String> = subset
            .not_ready_addresses
            .iter()
            .flatten()
            .filter_map(|address| address.target_ref.as_ref())
            .filter_map(|target| target.name.clone())
            .collect();

        if ready == 0 && !not_ready.is_empty() {
            let pods = not_ready.join(", ");
            let sensitive = not_ready.into_iter().map(Sensitive::new).collect();
            failures.push(Failure::with_sensitive(
                format!("Service has not ready endpoints, pods: {}", pods),
                sensitive,
            ));
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::fake::FakeCluster;
    use k8s_openapi::api::core::v1::{
        EndpointAddress, EndpointSubset, ObjectReference, Service, ServiceSpec,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeMap;

    fn meta(namespace: &str, name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        }
    }

    fn empty_endpoints(namespace: &str, name: &str) -> Endpoints {
        Endpoints {
            metadata: meta(namespace, name),
            subsets: None,
        }
    }

    fn selector_service(namespace: &str, name: &str, label: &str, value: &str) -> Service {
        Service {
            metadata: meta(namespace, name),
            spec: Some(ServiceSpec {
                selector: Some(BTreeMap::from([(label.to_string(), value.to_string())])),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    async fn run(cluster: &FakeCluster) -> Vec<Finding> {
        ServiceAnalyzer
            .analyze(cluster, Some("default"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn unmatched_selector_is_reported_with_masked_labels() {
        let cluster = FakeCluster::new()
            .with_endpoints(empty_endpoints("default", "api"))
            .with_service(selector_service("default", "api", "app", "payments"));

        let findings = run(&cluster).await;
        assert_eq!(findings.len(), 1);

        let failure = &findings[0].failures[0];
        assert_eq!(
            failure.text,
            "Service has no endpoints, expected label app=payments"
        );
        assert_eq!(
            failure.masked_text(),
            "Service has no endpoints, expected label ***=********"
        );
    }

    #[tokio::test]
    async fn not_ready_addresses_are_reported() {
        let cluster = FakeCluster::new().with_endpoints(Endpoints {
            metadata: meta("default", "api"),
            subsets: Some(vec![EndpointSubset {
                addresses: None,
                not_ready_addresses: Some(vec![EndpointAddress {
                    ip: "10.0.0.7".to_string(),
                    target_ref: Some(ObjectReference {
                        name: Some("api-7c9d".to_string()),
                        ..Default::default()
                    }),
                    ..Default::default()
                }]),
                ..Default::default()
            }]),
        });

        let findings = run(&cluster).await;
        assert_eq!(findings.len(), 1);
        let failure = &findings[0].failures[0];
        assert!(failure.text.contains("not ready endpoints"));
        assert!(failure.text.contains("api-7c9d"));
        assert!(!failure.masked_text().contains("api-7c9d"));
    }

    #[tokio::test]
    async fn ready_endpoints_produce_nothing() {
        let cluster = FakeCluster::new().with_endpoints(Endpoints {
            metadata: meta("default", "api"),
            subsets: Some(vec![EndpointSubset {
                addresses: Some(vec![EndpointAddress {
                    ip: "10.0.0.7".to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }]),
        });
        assert!(run(&cluster).await.is_empty());
    }

    #[tokio::test]
    async fn selectorless_service_is_skipped() {
        // Headless/external services legitimately manage their own endpoints.
        let cluster = FakeCluster::new()
            .with_endpoints(empty_endpoints("default", "external-db"))
            .with_service(Service {
                metadata: meta("default", "external-db"),
                spec: Some(ServiceSpec::default()),
                ..Default::default()
            });
        assert!(run(&cluster).await.is_empty());
    }

    #[tokio::test]
    async fn orphan_endpoints_without_service_are_skipped() {
        let cluster = FakeCluster::new().with_endpoints(empty_endpoints("default", "ghost"));
        assert!(run(&cluster).await.is_empty());
    }
}
