//! Read-only access to live cluster resources.
//!
//! Analyzers never touch `kube` directly; they go through the
//! [`ClusterReader`] trait so tests can substitute an in-memory
//! [`fake::FakeCluster`]. The production implementation wraps a shared
//! `kube::Client`, which is safe for concurrent reads, so one reader is
//! shared across all concurrently running analyzers.
//!
//! # Prerequisites
//!
//! - Valid kubeconfig (uses the default context or a specified one)
//! - RBAC permissions to read the inspected resource kinds

pub mod fake;

use async_trait::async_trait;
use k8s_openapi::api::core::v1::{Endpoints, PersistentVolumeClaim, Pod, Secret, Service};
use k8s_openapi::api::networking::v1::{Ingress, IngressClass};
use kube::{
    api::{Api, ListParams},
    Client, Config,
};

/// Error type for cluster read operations.
///
/// API errors are opaque: analyzers forward them without interpreting the
/// underlying cause.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("failed to create Kubernetes client: {0}")]
    ClientCreation(#[from] kube::Error),

    #[error("failed to infer Kubernetes config: {0}")]
    ConfigError(#[from] kube::config::InferConfigError),

    #[error("failed to read kubeconfig: {0}")]
    KubeconfigError(#[from] kube::config::KubeconfigError),

    #[error("API request failed: {0}")]
    ApiError(String),
}

/// The list/get operations analyzers need, scoped by namespace
/// (`None` = all namespaces).
#[async_trait]
pub trait ClusterReader: Send + Sync {
    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, ClusterError>;
    async fn list_services(&self, namespace: Option<&str>) -> Result<Vec<Service>, ClusterError>;
    async fn list_endpoints(&self, namespace: Option<&str>) -> Result<Vec<Endpoints>, ClusterError>;
    async fn list_ingresses(&self, namespace: Option<&str>) -> Result<Vec<Ingress>, ClusterError>;
    /// IngressClass is cluster-scoped, so no namespace argument.
    async fn list_ingress_classes(&self) -> Result<Vec<IngressClass>, ClusterError>;
    async fn list_pvcs(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<PersistentVolumeClaim>, ClusterError>;
    async fn get_service(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Service>, ClusterError>;
    async fn get_secret(&self, namespace: &str, name: &str)
        -> Result<Option<Secret>, ClusterError>;
}

/// Production [`ClusterReader`] backed by a `kube::Client`.
pub struct KubeCluster {
    client: Client,
}

impl KubeCluster {
    /// Connect using the default kubeconfig context.
    pub async fn new() -> Result<Self, ClusterError> {
        let config = Config::infer().await?;
        let client = Client::try_from(config)?;
        Ok(Self { client })
    }

    /// Connect using a specific kubeconfig context.
    pub async fn with_context(context: &str) -> Result<Self, ClusterError> {
        let kubeconfig = kube::config::Kubeconfig::read()?;
        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &kube::config::KubeConfigOptions {
                context: Some(context.to_string()),
                ..Default::default()
            },
        )
        .await?;
        let client = Client::try_from(config)?;
        Ok(Self { client })
    }

    fn namespaced_api<K>(&self, namespace: Option<&str>) -> Api<K>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>,
        K::DynamicType: Default,
    {
        match namespace {
            Some(ns) => Api::namespaced(self.client.clone(), ns),
            None => Api::all(self.client.clone()),
        }
    }

    async fn list<K>(&self, namespace: Option<&str>, kind: &str) -> Result<Vec<K>, ClusterError>
    where
        K: kube::Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + serde::de::DeserializeOwned
            + std::fmt::Debug,
        K::DynamicType: Default,
    {
        let api: Api<K> = self.namespaced_api(namespace);
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::ApiError(format!("failed to list {}: {}", kind, e)))?;
        Ok(list.items)
    }
}

#[async_trait]
impl ClusterReader for KubeCluster {
    async fn list_pods(&self, namespace: Option<&str>) -> Result<Vec<Pod>, ClusterError> {
        self.list(namespace, "pods").await
    }

    async fn list_services(&self, namespace: Option<&str>) -> Result<Vec<Service>, ClusterError> {
        self.list(namespace, "services").await
    }

    async fn list_endpoints(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<Endpoints>, ClusterError> {
        self.list(namespace, "endpoints").await
    }

    async fn list_ingresses(&self, namespace: Option<&str>) -> Result<Vec<Ingress>, ClusterError> {
        self.list(namespace, "ingresses").await
    }

    async fn list_ingress_classes(&self) -> Result<Vec<IngressClass>, ClusterError> {
        let api: Api<IngressClass> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|e| ClusterError::ApiError(format!("failed to list ingress classes: {}", e)))?;
        Ok(list.items)
    }

    async fn list_pvcs(
        &self,
        namespace: Option<&str>,
    ) -> Result<Vec<PersistentVolumeClaim>, ClusterError> {
        self.list(namespace, "persistent volume claims").await
    }

    async fn get_service(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Service>, ClusterError> {
        let api: Api<Service> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name)
            .await
            .map_err(|e| ClusterError::ApiError(format!("failed to get service {}: {}", name, e)))
    }

    async fn get_secret(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<Secret>, ClusterError> {
        let api: Api<Secret> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name)
            .await
            .map_err(|e| ClusterError::ApiError(format!("failed to get secret {}: {}", name, e)))
    }
}
