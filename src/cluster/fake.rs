//! In-memory [`ClusterReader`] for tests.
//!
//! Seed it with typed `k8s-openapi` objects; namespace scoping follows the
//! same contract as the live client (`None` = all namespaces).

use super::{ClusterError, ClusterReader};
use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Endpoints, PersistentVolumeClaim, Pod, Secret, Service};
use k8s_openapi::api::networking::v1::{Ingress, IngressClass};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

#[derive(Default)]
pub struct FakeCluster {
    pub pods: Vec<Pod>,
    pub services: Vec<Service>,
    pub endpoints: Vec<Endpoints>,
    pub ingresses: Vec<Ingress>,
    pub ingress_classes: Vec<IngressClass>,
    pub pvcs: Vec<PersistentVolumeClaim>,
    pub secrets: Vec<Secret>,
    /// When set, every call fails with this message. Used to exercise
    /// analyzer error isolation.
    pub fail_with: Option<String>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pod(mut self, pod: Pod) -> Self {
        self.pods.push(pod);
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints.push(endpoints);
        self
    }

    pub fn with_ingress(mut self, ingress: Ingress) -> Self {
        self.ingresses.push(ingress);
        self
    }

    pub fn with_ingress_class(mut self, class: IngressClass) -> Self {
        self.ingress_classes.push(class);
        self
    }

    pub fn with_pvc(mut self, pvc: PersistentVolumeClaim) -> Self {
        self.pvcs.push(pvc);
        self
    }

    pub fn with_secret(mut self, secret: Secret) -> Self {
        self.secrets.push(secret);
        self
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_with: Some(message.into()),
            ..Self::default()
        }
    }

    fn check_failure(&self) -> Result<(), ClusterError> {
        match &self.fail_with {
            Some(message) => Err(ClusterError::ApiError(message.clone())),
            None => Ok(()),
        }
    }
}

fn in_namespace(meta: &ObjectMeta, namespace: Option<&str>) -> bool {
    match namespace {
        None => true,
        Some(ns) => meta.namespace.as_deref() == Some(ns),
    }
}

fn scoped<T: Clone>(items: &[T], namespace: Option<&str>, meta: impl Fn(&T) -> &ObjectMeta) -> Vec<T> {
    items
        .iter()
        .filter(|item| in_namespace(meta(item), namespace))
        .cloned()
        .collect()
}

#[async_trait]
impl ClusterReader for FakeCluster {
    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, ClusterError> {
        self.check_failure()?;
        Ok(scoped(&self.pods, namespace, |p| &p.metadata))
    }

    async fn list_services(&self, namespace: Option<&str>) -> Result<Vec<Service>, ClusterError> {
        self.check_failure()?;
        Ok(scoped(&self.services, namespace, |s| &s.metadata))
    }

    async fn list_endpoints(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<Endpoints>, ClusterError> {
        self.check_failure()?;
        Ok(scoped(&self.endpoints, namespace, |e| &e.metadata))
    }

    async fn list_ingresses(&self, namespace: Option<&str>) -> Result<Vec<Ingress>, ClusterError> {
        self.check_failure()?;
        Ok(scoped(&self.ingresses, namespace, |i| &i.metadata))
    }

    async fn list_ingress_classes(&self) -> Result<Vec<IngressClass>, ClusterError> {
        self.check_failure()?;
        Ok(self.ingress_classes.clone())
    }

    async fn list_pvcs(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<PersistentVolumeClaim>, ClusterError> {
        self.check_failure()?;
        Ok(scoped(&self.pvcs, namespace, |p| &p.metadata))
    }

    async fn get_service(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Service>, ClusterError> {
        self.check_failure()?;
        Ok(self
            .services
            .iter()
            .find(|s| {
                s.metadata.namespace.as_deref() == Some(namespace)
                    && s.metadata.name.as_deref() == Some(name)
            })
            .cloned())
    }

    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Secret>, ClusterError> {
        self.check_failure()?;
        Ok(self
            .secrets
            .iter()
            .find(|s| {
                s.metadata.namespace.as_deref() == Some(namespace)
                    && s.metadata.name.as_deref() == Some(name)
            })
            .cloned())
    }
}
