//! SWIFT v2 IP Configs Middleware
//!
//! Wraps the default IP configs request handler of a node-local container
//! networking agent. For pods labelled as multitenant it:
//! - checks that the pod's `MultitenantPodNetworkConfig` (MTPNC) is ready
//! - lets the default handler allocate the infrastructure IP configs
//! - appends the delegated NIC's IP config taken from the MTPNC
//! - computes routes for every returned interface, keyed on NIC type
//! - releases the default allocation if anything after it fails
//!
//! Pods without the label pass straight through to the default handler.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cluster_cache::KubeClusterCache;
//! use swiftv2_middleware::{
//!     EnvCidrSource, IpConfigsHandler, IpConfigsRequest, K8sSwiftV2Middleware, MiddlewareConfig,
//!     RequestContext,
//! };
//!
//! # async fn example<D, F>(default_handler: D, failure_handler: F) -> Result<(), Box<dyn std::error::Error>>
//! # where D: IpConfigsHandler, F: IpConfigsHandler + 'static {
//! let cache = KubeClusterCache::try_default().await?;
//! let middleware = K8sSwiftV2Middleware::new(
//!     cache,
//!     default_handler,
//!     Arc::new(failure_handler),
//!     EnvCidrSource,
//!     MiddlewareConfig::from_env()?,
//! );
//!
//! let request = IpConfigsRequest::new(br#"{"PodName":"pod-a","PodNamespace":"tenant-a"}"#.to_vec());
//! let response = middleware.handle(&RequestContext::new(), request).await?;
//! # Ok(())
//! # }
//! ```

pub mod cidr;
pub mod config;
pub mod context;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod types;

pub use config::{CidrSource, EnvCidrSource, MiddlewareConfig, RollbackPolicy, StaticCidrs};
pub use context::RequestContext;
pub use error::{ConfigError, HandlerError, IpConfigError, RouteError};
pub use handler::IpConfigsHandler;
pub use middleware::K8sSwiftV2Middleware;
pub use types::*;
