//! Mock ClusterCache for unit testing
//!
//! This module provides a mock implementation of ClusterCacheTrait that can be used
//! in unit tests without requiring a running Kubernetes API server.

use crate::cache_trait::ClusterCacheTrait;
use crate::error::CacheError;
use crds::MultitenantPodNetworkConfig;
use k8s_openapi::api::core::v1::Pod;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

type Key = (String, String);

fn key(namespace: &str, name: &str) -> Key {
    (namespace.to_string(), name.to_string())
}

/// Mock cluster cache for testing
///
/// This mock stores objects in memory and can be configured to return
/// specific responses for testing different scenarios: injected lookup
/// failures, and a queue of MTPNC reads that simulates the cache changing
/// between two lookups of the same object.
#[derive(Clone, Default)]
pub struct MockClusterCache {
    pods: Arc<Mutex<HashMap<Key, Pod>>>,
    mtpncs: Arc<Mutex<HashMap<Key, MultitenantPodNetworkConfig>>>,
    // Consumed front to back before falling back to `mtpncs`
    queued_mtpnc_reads: Arc<Mutex<VecDeque<Option<MultitenantPodNetworkConfig>>>>,
    pod_error: Arc<Mutex<Option<String>>>,
    mtpnc_error: Arc<Mutex<Option<String>>>,
    pod_lookups: Arc<Mutex<usize>>,
    mtpnc_lookups: Arc<Mutex<usize>>,
}

impl std::fmt::Debug for MockClusterCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockClusterCache")
            .field("pods", &self.pods.lock().unwrap().len())
            .field("mtpncs", &self.mtpncs.lock().unwrap().len())
            .finish_non_exhaustive()
    }
}

impl MockClusterCache {
    /// Create a new, empty mock cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pod to the mock store (for test setup)
    ///
    /// The pod must carry a namespace and name in its metadata.
    pub fn add_pod(&self, pod: Pod) {
        let namespace = pod.metadata.namespace.clone().unwrap_or_default();
        let name = pod.metadata.name.clone().unwrap_or_default();
        self.pods.lock().unwrap().insert((namespace, name), pod);
    }

    /// Add an MTPNC to the mock store (for test setup)
    pub fn add_mtpnc(&self, mtpnc: MultitenantPodNetworkConfig) {
        let namespace = mtpnc.metadata.namespace.clone().unwrap_or_default();
        let name = mtpnc.metadata.name.clone().unwrap_or_default();
        self.mtpncs.lock().unwrap().insert((namespace, name), mtpnc);
    }

    /// Queue a one-shot MTPNC read result; `None` reads as not found.
    ///
    /// Queued reads are returned in order, regardless of the requested key,
    /// before the regular store is consulted.
    pub fn queue_mtpnc_read(&self, mtpnc: Option<MultitenantPodNetworkConfig>) {
        self.queued_mtpnc_reads.lock().unwrap().push_back(mtpnc);
    }

    /// Make every pod lookup fail with the given message
    pub fn fail_pod_lookups(&self, message: impl Into<String>) {
        *self.pod_error.lock().unwrap() = Some(message.into());
    }

    /// Make every MTPNC lookup fail with the given message
    pub fn fail_mtpnc_lookups(&self, message: impl Into<String>) {
        *self.mtpnc_error.lock().unwrap() = Some(message.into());
    }

    /// Number of pod lookups served so far
    #[must_use]
    pub fn pod_lookups(&self) -> usize {
        *self.pod_lookups.lock().unwrap()
    }

    /// Number of MTPNC lookups served so far
    #[must_use]
    pub fn mtpnc_lookups(&self) -> usize {
        *self.mtpnc_lookups.lock().unwrap()
    }
}

#[async_trait::async_trait]
impl ClusterCacheTrait for MockClusterCache {
    async fn get_pod(&self, namespace: &str, name: &str) -> Result<Pod, CacheError> {
        *self.pod_lookups.lock().unwrap() += 1;
        if let Some(message) = self.pod_error.lock().unwrap().clone() {
            return Err(CacheError::Lookup(message));
        }
        self.pods
            .lock()
            .unwrap()
            .get(&key(namespace, name))
            .cloned()
            .ok_or_else(|| CacheError::not_found("Pod", namespace, name))
    }

    async fn get_mtpnc(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<MultitenantPodNetworkConfig, CacheError> {
        *self.mtpnc_lookups.lock().unwrap() += 1;
        if let Some(message) = self.mtpnc_error.lock().unwrap().clone() {
            return Err(CacheError::Lookup(message));
        }
        if let Some(queued) = self.queued_mtpnc_reads.lock().unwrap().pop_front() {
            return queued
                .ok_or_else(|| CacheError::not_found("MultitenantPodNetworkConfig", namespace, name));
        }
        self.mtpncs
            .lock()
            .unwrap()
            .get(&key(namespace, name))
            .cloned()
            .ok_or_else(|| CacheError::not_found("MultitenantPodNetworkConfig", namespace, name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crds::{MultitenantPodNetworkConfigSpec, MultitenantPodNetworkConfigStatus};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn meta(namespace: &str, name: &str) -> ObjectMeta {
        ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        }
    }

    fn mtpnc(primary_ip: &str) -> MultitenantPodNetworkConfig {
        MultitenantPodNetworkConfig {
            metadata: meta("ns", "pod"),
            spec: MultitenantPodNetworkConfigSpec::default(),
            status: Some(MultitenantPodNetworkConfigStatus {
                primary_ip: primary_ip.to_string(),
                ..Default::default()
            }),
        }
    }

    #[tokio::test]
    async fn test_get_pod_found_and_not_found() {
        let cache = MockClusterCache::new();
        cache.add_pod(Pod {
            metadata: meta("ns", "pod"),
            ..Default::default()
        });

        let pod = cache.get_pod("ns", "pod").await.expect("pod should exist");
        assert_eq!(pod.metadata.name.as_deref(), Some("pod"));

        let err = cache.get_pod("ns", "other").await.expect_err("pod should be missing");
        assert!(err.is_not_found());
        assert_eq!(cache.pod_lookups(), 2);
    }

    #[tokio::test]
    async fn test_injected_failure_is_not_not_found() {
        let cache = MockClusterCache::new();
        cache.fail_mtpnc_lookups("cache unavailable");

        let err = cache.get_mtpnc("ns", "pod").await.expect_err("lookup should fail");
        assert!(!err.is_not_found());
        assert!(err.to_string().contains("cache unavailable"));
    }

    #[tokio::test]
    async fn test_queued_reads_take_precedence_over_store() {
        let cache = MockClusterCache::new();
        cache.add_mtpnc(mtpnc("10.0.0.9/32"));
        cache.queue_mtpnc_read(Some(mtpnc("10.0.0.1/32")));
        cache.queue_mtpnc_read(None);

        let first = cache.get_mtpnc("ns", "pod").await.expect("queued read");
        assert_eq!(first.status.map(|s| s.primary_ip).as_deref(), Some("10.0.0.1/32"));

        assert!(cache.get_mtpnc("ns", "pod").await.expect_err("queued miss").is_not_found());

        let third = cache.get_mtpnc("ns", "pod").await.expect("store read");
        assert_eq!(third.status.map(|s| s.primary_ip).as_deref(), Some("10.0.0.9/32"));
        assert_eq!(cache.mtpnc_lookups(), 3);
    }
}
