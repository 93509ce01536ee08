//! Request validation
//!
//! Decides whether the requesting pod needs a delegated NIC and, if it does,
//! that its MTPNC is ready to be used.

use crate::context::RequestContext;
use crate::error::{IpConfigError, ValidationFailure};
use crate::types::{IpConfigsRequest, PodInfo};
use cluster_cache::ClusterCacheTrait;
use tracing::{debug, info};

/// Outcome of a successful validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodDecision {
    /// Identity of the requesting pod
    pub pod_info: PodInfo,
    /// The pod is multitenant and gets a delegated NIC on top of its default IP configs
    pub needs_secondary_interface: bool,
}

/// Validate an IP configs request.
///
/// The pod is looked up through `cache`; if it carries `pod_network_label`
/// its MTPNC must exist and be ready. Every failure is reported as
/// `UnexpectedError`. A not-ready MTPNC is reported with the message
/// "mtpnc is not ready" so callers can retry it.
pub async fn validate_ip_configs_request<C>(
    cache: &C,
    pod_network_label: &str,
    ctx: &RequestContext,
    request: &IpConfigsRequest,
) -> Result<PodDecision, ValidationFailure>
where
    C: ClusterCacheTrait + ?Sized,
{
    let pod_info = PodInfo::from_request(request).map_err(|e| {
        ValidationFailure::unexpected(format!(
            "failed to unmarshalling pod info from ipconfigs request {request}: {e}"
        ))
    })?;
    info!("[SWIFTv2Middleware] validate ipconfigs request for pod {}", pod_info.name());

    let pod = ctx
        .run(cache.get_pod(pod_info.namespace(), pod_info.name()))
        .await
        .map_err(|e| ValidationFailure::unexpected(e.to_string()))?
        .map_err(|e| ValidationFailure::unexpected(format!("failed to get pod {pod_info}: {e}")))?;

    let needs_secondary_interface = pod
        .metadata
        .labels
        .as_ref()
        .is_some_and(|labels| labels.contains_key(pod_network_label));

    if needs_secondary_interface {
        let mtpnc = ctx
            .run(cache.get_mtpnc(pod_info.namespace(), pod_info.name()))
            .await
            .map_err(|e| ValidationFailure::unexpected(e.to_string()))?
            .map_err(|e| ValidationFailure::unexpected(IpConfigError::Cache(e).to_string()))?;

        if !mtpnc.is_ready() {
            debug!("[SWIFTv2Middleware] mtpnc for pod {} is not ready: {:?}", pod_info, mtpnc.status);
            return Err(ValidationFailure::unexpected(IpConfigError::NotReady.to_string()));
        }
    }

    info!(
        "[SWIFTv2Middleware] pod {} has secondary interface : {}",
        pod_info.name(),
        needs_secondary_interface
    );
    Ok(PodDecision {
        pod_info,
        needs_secondary_interface,
    })
}
