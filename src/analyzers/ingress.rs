//! Ingress analyzer: ingress-class wiring, backend services, TLS secrets.

use crate::analysis::{Analyzer, Failure, Finding};
use crate::cluster::{ClusterError, ClusterReader};
use async_trait::async_trait;
use k8s_openapi::api::networking::v1::Ingress;

const INGRESS_CLASS_ANNOTATION: &str = "kubernetes.io/ingress.class";

pub struct IngressAnalyzer;

#[async_trait]
impl Analyzer for IngressAnalyzer {
    fn name(&self) -> &'static str {
        "Ingress"
    }

    async fn analyze(
        &self,
        cluster: &dyn ClusterReader,
        namespace: Option<&str>,
    ) -> Result<Vec<Finding>, ClusterError> {
        let ingresses = cluster.list_ingresses(namespace).await?;
        // Fetched once per run; an Ingress without an explicit class is only
        // a problem when the cluster offers no IngressClass at all.
        let ingress_classes = cluster.list_ingress_classes().await?;

        let mut findings = Vec::new();
        for ingress in ingresses {
            let name = ingress.metadata.name.clone().unwrap_or_default();
            let ns = ingress.metadata.namespace.clone().unwrap_or_default();
            let mut failures = Vec::new();

            if !has_ingress_class(&ingress) && ingress_classes.is_empty() {
                failures.push(Failure::new(format!(
                    "Ingress {}/{} does not specify an Ingress class and no IngressClass exists in the cluster",
                    ns, name
                )));
            }

            check_backends(cluster, &ingress, &ns, &mut failures).await?;
            check_tls_secrets(cluster, &ingress, &ns, &mut failures).await?;

            if !failures.is_empty() {
                findings.push(Finding::new(self.name(), name, ns.clone(), failures));
            }
        }
        Ok(findings)
    }
}

fn has_ingress_class(ingress: &Ingress) -> bool {
    if let Some(spec) = &ingress.spec {
        if spec.ingress_class_name.is_some() {
            return true;
        }
    }
    ingress
        .metadata
        .annotations
        .as_ref()
        .is_some_and(|annotations| annotations.contains_key(INGRESS_CLASS_ANNOTATION))
}

/// Every service referenced by a rule backend must exist.
async fn check_backends(
    cluster: &dyn ClusterReader,
    ingress: &Ingress,
    ns: &str,
    failures: &mut Vec<Failure>,
) -> Result<(), ClusterError> {
    let Some(spec) = &ingress.spec else {
        return Ok(());
    };
    for rule in spec.rules.iter().flatten() {
        let Some(http) = &rule.http else { continue };
        for path in &http.paths {
            let Some(backend) = &path.backend.service else {
                continue;
            };
            if cluster.get_service(ns, &backend.name).await?.is_none() {
                failures.push(Failure::new(format!(
                    "Ingress uses the service {}/{} which does not exist",
                    ns, backend.name
                )));
            }
        }
    }
    Ok(())
}

/// Every TLS entry naming a secret must resolve to one.
async fn check_tls_secrets(
    cluster: &dyn ClusterReader,
    ingress: &Ingress,
    ns: &str,
    failures: &mut Vec<Failure>,
) -> Result<(), ClusterError> {
    let Some(spec) = &ingress.spec else {
        return Ok(());
    };
    for tls in spec.tls.iter().flatten() {
        let Some(secret_name) = &tls.secret_name else {
            continue;
        };
        if cluster.get_secret(ns, secret_name).await?.is_none() {
            failures.push(Failure::new(format!(
                "Ingress uses the secret {}/{} as a TLS certificate which does not exist",
                ns, secret_name
            )));
        }
    }
    Ok(())
}
