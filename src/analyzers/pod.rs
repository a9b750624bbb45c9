//! Pod analyzer: containers stuck waiting and pods that cannot schedule.

use crate::analysis::{Analyzer, Failure, Finding};
use crate::cluster::{ClusterError, ClusterReader};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::Pod;

/// Waiting reasons that indicate a stuck container rather than a normal
/// startup transition.
const STUCK_WAITING_REASONS: &[&str] = &["CrashLoopBackOff", "ImagePullBackOff", "ErrImagePull"];

pub struct PodAnalyzer;

#[async_trait]
impl Analyzer for PodAnalyzer {
    fn name(&self) -> &'static str {
        "Pod"
    }

    async fn analyze(
        &self,
        cluster: &dyn ClusterReader,
        namespace: Option<&str>,
    ) -> Result<Vec<Finding>, ClusterError> {
        let pods = cluster.list_pods(namespace).await?;

        let mut findings = Vec::new();
        for pod in pods {
            let name = pod.metadata.name.clone().unwrap_or_default();
            let ns = pod.metadata.namespace.clone().unwrap_or_default();
            let failures = pod_failures(&pod);
            if !failures.is_empty() {
                findings.push(Finding::new(self.name(), name, ns, failures));
            }
        }
        Ok(findings)
    }
}

fn pod_failures(pod: &Pod) -> Vec<Failure> {
    let mut failures = Vec::new();
    let Some(status) = &pod.status else {
        return failures;
    };

    if status.phase.as_deref() == Some("Pending") {
        for condition in status.conditions.iter().flatten() {
            if condition.type_ == "PodScheduled"
                && condition.status == "False"
                && condition.reason.as_deref() == Some("Unschedulable")
            {
                let detail = condition
                    .message
                    .clone()
                    .unwrap_or_else(|| "no nodes available".to_string());
                failures.push(Failure::new(detail));
            }
        }
    }

    for container in status.container_statuses.iter().flatten() {
        let Some(waiting) = container.state.as_ref().and_then(|s| s.waiting.as_ref()) else {
            continue;
        };
        let Some(reason) = waiting.reason.as_deref() else {
            continue;
        };
        if STUCK_WAITING_REASONS.contains(&reason) {
            let text = match &waiting.message {
                Some(message) => format!(
                    "Container {} is in {} state: {}",
                    container.name, reason, message
                ),
                None => format!("Container {} is in {} state", container.name, reason),
            };
            failures.push(Failure::new(text));
        }
    }

    failures
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::fake::FakeCluster;
    use k8s_openapi::api::core::v1::{
        ContainerState, ContainerStateWaiting, ContainerStatus, PodCondition, PodStatus,
    };
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn pod(namespace: &str, name: &str, status: PodStatus) -> Pod {
        Pod {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            status: Some(status),
            ..Default::default()
        }
    }

    fn waiting_container(name: &str, reason: &str, message: Option<&str>) -> ContainerStatus {
        ContainerStatus {
            name: name.to_string(),
            state: Some(ContainerState {
                waiting: Some(ContainerStateWaiting {
                    reason: Some(reason.to_string()),
                    message: message.map(str::to_string),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    async fn run(cluster: &FakeCluster) -> Vec<Finding> {
        PodAnalyzer.analyze(cluster, Some("default")).await.unwrap()
    }

    #[tokio::test]
    async fn healthy_pods_produce_nothing() {
        let cluster = FakeCluster::new().with_pod(pod(
            "default",
            "web",
            PodStatus {
                phase: Some("Running".to_string()),
                ..Default::default()
            },
        ));
        assert!(run(&cluster).await.is_empty());
    }

    #[tokio::test]
    async fn crashlooping_container_is_reported() {
        let cluster = FakeCluster::new().with_pod(pod(
            "default",
            "web",
            PodStatus {
                phase: Some("Running".to_string()),
                container_statuses: Some(vec![waiting_container(
                    "app",
                    "CrashLoopBackOff",
                    Some("back-off 5m0s restarting failed container"),
                )]),
                ..Default::default()
            },
        ));

        let findings = run(&cluster).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "web");
        assert!(findings[0].failures[0].text.contains("CrashLoopBackOff"));
        assert!(findings[0].failures[0].text.contains("back-off 5m0s"));
    }

    #[tokio::test]
    async fn unschedulable_pending_pod_is_reported() {
        let cluster = FakeCluster::new().with_pod(pod(
            "default",
            "web",
            PodStatus {
                phase: Some("Pending".to_string()),
                conditions: Some(vec![PodCondition {
                    type_: "PodScheduled".to_string(),
                    status: "False".to_string(),
                    reason: Some("Unschedulable".to_string()),
                    message: Some("0/3 nodes are available: insufficient memory".to_string()),
                    ..Default::default()
                }]),
                ..Default::default()
            },
        ));

        let findings = run(&cluster).await;
        assert_eq!(findings.len(), 1);
        assert!(findings[0].failures[0].text.contains("insufficient memory"));
    }

    #[tokio::test]
    async fn one_pod_with_two_stuck_containers_is_one_finding() {
        let cluster = FakeCluster::new().with_pod(pod(
            "default",
            "web",
            PodStatus {
                phase: Some("Running".to_string()),
                container_statuses: Some(vec![
                    waiting_container("app", "CrashLoopBackOff", None),
                    waiting_container("sidecar", "ImagePullBackOff", None),
                ]),
                ..Default::default()
            },
        ));

        let findings = run(&cluster).await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].failures.len(), 2);
    }

    #[tokio::test]
    async fn benign_waiting_reason_is_ignored() {
        let cluster = FakeCluster::new().with_pod(pod(
            "default",
            "web",
            PodStatus {
                phase: Some("Pending".to_string()),
                container_statuses: Some(vec![waiting_container(
                    "app",
                    "ContainerCreating",
                    None,
                )]),
                ..Default::default()
            },
        ));
        assert!(run(&cluster).await.is_empty());
    }
}
