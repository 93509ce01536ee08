//! Multitenancy CRD Definitions
//!
//! Kubernetes Custom Resource Definitions consumed by the SWIFT v2 middleware.
//! The resources are reconciled by an external controller; this crate only
//! describes their shape and decides when their status is usable.

pub mod multitenant_pod_network_config;

pub use multitenant_pod_network_config::*;
