//! Cluster Object Cache
//!
//! Read-only access to the Kubernetes objects the SWIFT v2 middleware needs:
//! pods and their `MultitenantPodNetworkConfig` resources.
//!
//! The cache is treated as eventually consistent. A missing object is reported
//! as [`CacheError::NotFound`] so callers can tell "not there yet" apart from
//! transport or API failures.
//!
//! # Example
//!
//! ```no_run
//! use cluster_cache::{ClusterCacheTrait, KubeClusterCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = KubeClusterCache::try_default().await?;
//! let pod = cache.get_pod("tenant-a", "pod-a").await?;
//! let mtpnc = cache.get_mtpnc("tenant-a", "pod-a").await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
#[path = "trait.rs"]
pub mod cache_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use cache_trait::ClusterCacheTrait;
pub use client::KubeClusterCache;
pub use error::CacheError;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockClusterCache;
