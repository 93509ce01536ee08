//! Kubernetes-backed cluster cache
//!
//! Implements [`ClusterCacheTrait`] on top of `kube::Api`. Lookups go to the
//! API server (or whatever caching proxy the `kube::Client` is configured
//! with); no local state is kept.

use crate::cache_trait::ClusterCacheTrait;
use crate::error::CacheError;
use crds::MultitenantPodNetworkConfig;
use k8s_openapi::api::core::v1::Pod;
use kube::{Api, Client};
use tracing::debug;

/// Cluster cache backed by a Kubernetes client
#[derive(Clone)]
pub struct KubeClusterCache {
    client: Client,
}

impl std::fmt::Debug for KubeClusterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeClusterCache").finish_non_exhaustive()
    }
}

impl KubeClusterCache {
    /// Create a cache from an existing Kubernetes client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Create a cache using the in-cluster or kubeconfig defaults
    pub async fn try_default() -> Result<Self, CacheError> {
        let client = Client::try_default().await?;
        Ok(Self::new(client))
    }
}

#[async_trait::async_trait]
impl ClusterCacheTrait for KubeClusterCache {
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, CacheError> {
        debug!("Fetching pod {}/{}", namespace, name);
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name)
            .await?
            .ok_or_else(|| CacheError::not_found("Pod", namespace, name))
    }

    async fn get_mtpnc(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<MultitenantPodNetworkConfig, CacheError> {
        debug!("Fetching MultitenantPodNetworkConfig {}/{}", namespace, name);
        let api: Api<MultitenantPodNetworkConfig> = Api::namespaced(self.client.clone(), namespace);
        api.get_opt(name)
            .await?
            .ok_or_else(|| CacheError::not_found("MultitenantPodNetworkConfig", namespace, name))
    }
}
