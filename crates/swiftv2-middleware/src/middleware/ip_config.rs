//! Delegated NIC IP config resolution
//!
//! Converts a pod's MTPNC status into the IP config of its delegated NIC.

use crate::context::RequestContext;
use crate::error::IpConfigError;
use crate::types::{IpSubnet, NicType, PodInfo, PodIpInfo};
use cluster_cache::ClusterCacheTrait;
use ipnet::IpNet;
use tracing::debug;

/// Get the pod's SWIFT v2 IP config from its MTPNC.
///
/// The MTPNC is fetched again rather than reused from validation; the cache
/// may have changed in between, so readiness is checked again too. The
/// primary IP must be a host prefix (/32, or /128 for IPv6). Routes are left
/// empty for the route builder to fill in.
pub async fn get_ip_config<C>(
    cache: &C,
    ctx: &RequestContext,
    pod_info: &PodInfo,
) -> Result<PodIpInfo, IpConfigError>
where
    C: ClusterCacheTrait + ?Sized,
{
    let mtpnc = ctx
        .run(cache.get_mtpnc(pod_info.namespace(), pod_info.name()))
        .await??;

    let status = match mtpnc.status.as_ref() {
        Some(status) if status.is_ready() => status,
        _ => return Err(IpConfigError::NotReady),
    };
    debug!("[SWIFTv2Middleware] mtpnc for pod {} is : {:?}", pod_info.name(), status);

    let primary_ip: IpNet = status
        .primary_ip
        .parse()
        .map_err(|source| IpConfigError::ParsePrimaryIp {
            primary_ip: status.primary_ip.clone(),
            source,
        })?;
    if primary_ip.prefix_len() != primary_ip.max_prefix_len() {
        return Err(IpConfigError::InvalidPrefixLength(primary_ip.prefix_len()));
    }

    Ok(PodIpInfo {
        pod_ip_config: IpSubnet {
            ip_address: primary_ip.addr().to_string(),
            prefix_length: primary_ip.prefix_len(),
        },
        mac_address: status.mac_address.clone(),
        nic_type: NicType::from(status.nic_type.as_str()),
        // Delegated NICs are wired by NIC type, not by name
        interface_name: String::new(),
        skip_default_routes: false,
        routes: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::test_utils::*;
    use cluster_cache::MockClusterCache;

    async fn resolve(cache: &MockClusterCache) -> Result<PodIpInfo, IpConfigError> {
        get_ip_config(cache, &RequestContext::new(), &PodInfo::new("pod-a", "tenant-a")).await
    }

    fn cache_with(primary_ip: &str, nic_type: &str) -> MockClusterCache {
        let cache = MockClusterCache::new();
        cache.add_mtpnc(ready_mtpnc("tenant-a", "pod-a", primary_ip, nic_type));
        cache
    }

    #[tokio::test]
    async fn test_resolves_ipv4_host_prefix() {
        let cache = cache_with("10.0.0.5/32", "DelegatedVMNIC");

        let info = resolve(&cache).await.expect("ready mtpnc should resolve");

        assert_eq!(info.pod_ip_config.ip_address, "10.0.0.5");
        assert_eq!(info.pod_ip_config.prefix_length, 32);
        assert_eq!(info.mac_address, "00:0d:3a:12:34:56");
        assert_eq!(info.nic_type, NicType::DelegatedVmNic);
        assert!(info.interface_name.is_empty());
        assert!(!info.skip_default_routes);
        assert!(info.routes.is_empty());
    }

    #[tokio::test]
    async fn test_resolves_ipv6_host_prefix() {
        let cache = cache_with("fd00::5/128", "DelegatedVMNIC");

        let info = resolve(&cache).await.expect("ipv6 /128 should resolve");

        assert_eq!(info.pod_ip_config.ip_address, "fd00::5");
        assert_eq!(info.pod_ip_config.prefix_length, 128);
    }

    #[tokio::test]
    async fn test_nic_type_copied_verbatim() {
        for tag in ["InfraNIC", "BackendNIC", "FrontendNIC_Accelnet", "SomeFutureNIC"] {
            let cache = cache_with("10.0.0.5/32", tag);
            let info = resolve(&cache).await.expect("ready mtpnc should resolve");
            assert_eq!(info.nic_type.as_str(), tag);
        }
    }

    #[tokio::test]
    async fn test_non_host_prefix_is_rejected() {
        let cache = cache_with("10.0.0.5/24", "DelegatedVMNIC");

        let err = resolve(&cache).await.expect_err("/24 must be rejected");

        assert!(matches!(err, IpConfigError::InvalidPrefixLength(24)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_ipv6_non_host_prefix_is_rejected() {
        let cache = cache_with("fd00::5/64", "DelegatedVMNIC");
        assert!(matches!(resolve(&cache).await, Err(IpConfigError::InvalidPrefixLength(64))));
    }

    #[tokio::test]
    async fn test_unparseable_primary_ip() {
        let cache = cache_with("10.0.0.5", "DelegatedVMNIC");

        let err = resolve(&cache).await.expect_err("bare address must be rejected");

        match err {
            IpConfigError::ParsePrimaryIp { primary_ip, .. } => assert_eq!(primary_ip, "10.0.0.5"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_not_ready_on_second_read() {
        let cache = cache_with("10.0.0.5/32", "DelegatedVMNIC");
        let mut stale = ready_mtpnc("tenant-a", "pod-a", "10.0.0.5/32", "DelegatedVMNIC");
        stale.status = None;
        cache.queue_mtpnc_read(Some(stale));

        let err = resolve(&cache).await.expect_err("status-less mtpnc is not ready");

        assert!(matches!(err, IpConfigError::NotReady));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_missing_mtpnc() {
        let cache = MockClusterCache::new();
        let err = resolve(&cache).await.expect_err("missing mtpnc");
        assert!(matches!(err, IpConfigError::Cache(ref e) if e.is_not_found()));
    }
}
