//! ClusterCacheTrait for mocking
//!
//! This trait abstracts the cluster object cache to enable mocking in unit tests.
//! The concrete KubeClusterCache implements this trait, and tests can use mock implementations.

use crate::error::CacheError;
use crds::MultitenantPodNetworkConfig;
use k8s_openapi::api::core::v1::Pod;

/// Trait for read-only cluster object lookups
///
/// Implementations must be safe for concurrent reads; the middleware shares a
/// single instance across all in-flight requests and never writes through it.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait ClusterCacheTrait: Send + Sync {
    /// Get a pod by namespace and name
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, CacheError>;

    /// Get a pod's MultitenantPodNetworkConfig by namespace and name
    async fn get_mtpnc(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<MultitenantPodNetworkConfig, CacheError>;
}
