//! SWIFT v2 middleware
//!
//! [`K8sSwiftV2Middleware`] wraps a default IP configs handler and its paired
//! failure (release) handler. The pipeline for one request is:
//!
//! 1. validate the request against the cluster cache
//! 2. hand it to the default handler
//! 3. for multitenant pods, append the delegated NIC IP config and compute
//!    routes for every interface
//!
//! Once the default handler has been called for a multitenant pod, any later
//! failure releases the default allocation through the failure handler.

mod ip_config;
mod rollback;
mod routes;
mod validate;

#[cfg(test)]
mod test_utils;


pub use ip_config::get_ip_config;
pub use routes::{set_routes, OVERLAY_GATEWAY_V4, OVERLAY_GATEWAY_V6, VIRTUAL_GATEWAY};
pub use validate::{validate_ip_configs_request, PodDecision};

use crate::config::{CidrSource, EnvCidrSource, MiddlewareConfig};
use crate::context::{Cancelled, RequestContext};
use crate::error::{HandlerError, IpConfigError};
use crate::handler::IpConfigsHandler;
use crate::types::{IpConfigsRequest, IpConfigsResponse, PodInfo};
use cluster_cache::ClusterCacheTrait;
use rollback::RollbackGuard;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// IP configs middleware for SWIFT v2 multitenant pods
///
/// Holds no per-request state and can serve concurrent requests.
pub struct K8sSwiftV2Middleware<C, D, F, S = EnvCidrSource>
where
    F: ?Sized,
{
    cache: C,
    default_handler: D,
    failure_handler: Arc<F>,
    cidrs: S,
    config: MiddlewareConfig,
}

impl<C, D, F, S> std::fmt::Debug for K8sSwiftV2Middleware<C, D, F, S>
where
    F: ?Sized,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sSwiftV2Middleware")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<C, D, F, S> K8sSwiftV2Middleware<C, D, F, S>
where
    C: ClusterCacheTrait,
    D: IpConfigsHandler,
    F: IpConfigsHandler + ?Sized + 'static,
    S: CidrSource,
{
    /// Wrap `default_handler`, releasing through `failure_handler` on failure
    pub fn new(
        cache: C,
        default_handler: D,
        failure_handler: Arc<F>,
        cidrs: S,
        config: MiddlewareConfig,
    ) -> Self {
        Self {
            cache,
            default_handler,
            failure_handler,
            cidrs,
            config,
        }
    }

    /// Settings in use
    pub fn config(&self) -> &MiddlewareConfig {
        &self.config
    }

    /// Append the delegated NIC and set routes on every interface
    async fn add_secondary_interface(
        &self,
        ctx: &RequestContext,
        pod_info: &PodInfo,
        request_text: &str,
        mut response: IpConfigsResponse,
    ) -> Result<IpConfigsResponse, HandlerError> {
        let swift_v2_ip_info = get_ip_config(&self.cache, ctx, pod_info)
            .await
            .map_err(|source| match source {
                IpConfigError::Cancelled(Cancelled) => HandlerError::Cancelled,
                source => HandlerError::IpConfig {
                    request: request_text.to_string(),
                    source,
                },
            })?;
        debug!(
            "[SWIFTv2Middleware] delegated NIC IP config for pod {} : {:?}",
            pod_info, swift_v2_ip_info
        );
        response.pod_ip_info.push(swift_v2_ip_info);

        for pod_ip_info in &mut response.pod_ip_info {
            set_routes(pod_ip_info, &self.cidrs).map_err(|source| HandlerError::Routes {
                pod: pod_info.name().to_string(),
                request: request_text.to_string(),
                source,
            })?;
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl<C, D, F, S> IpConfigsHandler for K8sSwiftV2Middleware<C, D, F, S>
where
    C: ClusterCacheTrait,
    D: IpConfigsHandler,
    F: IpConfigsHandler + ?Sized + 'static,
    S: CidrSource,
{
    async fn handle(
        &self,
        ctx: &RequestContext,
        mut request: IpConfigsRequest,
    ) -> Result<IpConfigsResponse, HandlerError> {
        let decision =
            validate_ip_configs_request(&self.cache, &self.config.pod_network_label, ctx, &request)
                .await
                .map_err(|failure| {
                    warn!("[SWIFTv2Middleware] failed to validate ip configs request: {}", failure);
                    failure
                })?;
        request.secondary_interfaces_exist = decision.needs_secondary_interface;

        if !decision.needs_secondary_interface {
            return self.default_handler.handle(ctx, request).await;
        }

        let request_text = request.to_string();
        let guard = RollbackGuard::arm(Arc::clone(&self.failure_handler), request.clone());

        let response = match ctx.run(self.default_handler.handle(ctx, request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                if self.config.rollback_policy.releases_failed_allocation() {
                    guard.release().await;
                } else {
                    guard.disarm();
                }
                return Err(e);
            }
            Err(Cancelled) => {
                guard.release().await;
                return Err(HandlerError::Cancelled);
            }
        };

        match self
            .add_secondary_interface(ctx, &decision.pod_info, &request_text, response)
            .await
        {
            Ok(response) => {
                guard.disarm();
                Ok(response)
            }
            Err(e) => {
                error!("[SWIFTv2Middleware] {} : {:?}", e, std::error::Error::source(&e));
                guard.release().await;
                Err(e)
            }
        }
    }
}
