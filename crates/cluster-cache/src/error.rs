//! Cluster cache errors

use thiserror::Error;

/// Errors that can occur when reading objects from the cluster cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Kubernetes API error
    #[error("Kubernetes error: {0}")]
    Kube(#[from] kube::Error),

    /// Object not found (may appear later once the cache converges)
    #[error("{kind} {namespace}/{name} not found")]
    NotFound {
        /// Object kind, e.g. "Pod"
        kind: &'static str,
        /// Namespace that was searched
        namespace: String,
        /// Object name
        name: String,
    },

    /// Any other lookup failure (used by non-kube cache implementations)
    #[error("Lookup failed: {0}")]
    Lookup(String),
}

impl CacheError {
    pub(crate) fn not_found(kind: &'static str, namespace: &str, name: &str) -> Self {
        Self::NotFound {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        }
    }

    /// Returns true if the object simply does not exist (yet).
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
