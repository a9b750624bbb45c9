//! PersistentVolumeClaim analyzer: claims stuck waiting for a volume.

use crate::analysis::{Analyzer, Failure, Finding};
use crate::cluster::{ClusterError, ClusterReader};
use async_trait::async_trait;

pub struct PvcAnalyzer;

#[async_trait]
impl Analyzer for PvcAnalyzer {
    fn name(&self) -> &'static str {
        "PersistentVolumeClaim"
    }

    async fn analyze(
        &self,
        cluster: &dyn ClusterReader,
        namespace: Option<&str>,
    ) -> Result<Vec<Finding>, ClusterError> {
        let claims = cluster.list_pvcs(namespace).await?;

        let mut findings = Vec::new();
        for claim in claims {
            let phase = claim
                .status
                .as_ref()
                .and_then(|status| status.phase.as_deref());
            if phase != Some("Pending") {
                continue;
            }

            let name = claim.metadata.name.clone().unwrap_or_default();
            let ns = claim.metadata.namespace.clone().unwrap_or_default();
            findings.push(Finding::new(
                self.name(),
                name,
                ns,
                vec![Failure::new(
                    "PersistentVolumeClaim is in Pending state, no volume has been bound",
                )],
            ));
        }
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::fake::FakeCluster;
    use k8s_openapi::api::core::v1::{PersistentVolumeClaim, PersistentVolumeClaimStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn claim(namespace: &str, name: &str, phase: &str) -> PersistentVolumeClaim {
        PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                ..Default::default()
            },
            status: Some(PersistentVolumeClaimStatus {
                phase: Some(phase.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn pending_claim_is_reported() {
        let cluster = FakeCluster::new().with_pvc(claim("default", "data", "Pending"));
        let findings = PvcAnalyzer
            .analyze(&cluster, Some("default"))
            .await
            .unwrap();

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].name, "data");
        assert!(findings[0].failures[0].text.contains("Pending state"));
    }

    #[tokio::test]
    async fn bound_claim_is_ignored() {
        let cluster = FakeCluster::new().with_pvc(claim("default", "data", "Bound"));
        let findings = PvcAnalyzer
            .analyze(&cluster, Some("default"))
            .await
            .unwrap();
        assert!(findings.is_empty());
    }
}
