//! Route computation
//!
//! Routes depend on the NIC type of the interface:
//! - delegated NIC: default route via a link-local virtual gateway
//! - infra NIC: pod, service and infra VNET CIDRs via the overlay gateway,
//!   and no default route
//! - backend / accelnet frontend NICs: no routes yet

use crate::cidr::{parse_cidrs, CidrsByFamily};
use crate::config::CidrSource;
use crate::error::{CidrList, ConfigError, RouteError};
use crate::types::{NicType, PodIpInfo, Route};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::info;

/// Next hop for IPv4 traffic routed onto the infra NIC in overlay mode
pub const OVERLAY_GATEWAY_V4: Ipv4Addr = Ipv4Addr::new(169, 254, 1, 1);
/// Next hop for IPv6 traffic routed onto the infra NIC in overlay mode
pub const OVERLAY_GATEWAY_V6: Ipv6Addr = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0x1234, 0x5678, 0x9abc);
/// Link-local gateway behind the delegated NIC
pub const VIRTUAL_GATEWAY: Ipv4Addr = Ipv4Addr::new(169, 254, 2, 1);

/// Set the routes of one interface according to its NIC type.
///
/// Existing routes are replaced. On error the interface is left untouched.
pub fn set_routes<S>(pod_ip_info: &mut PodIpInfo, cidrs: &S) -> Result<(), RouteError>
where
    S: CidrSource + ?Sized,
{
    info!("[SWIFTv2Middleware] set routes for pod with nic type : {}", pod_ip_info.nic_type);
    match &pod_ip_info.nic_type {
        NicType::DelegatedVmNic => {
            pod_ip_info.routes = delegated_nic_routes();
        }
        NicType::InfraNic => {
            pod_ip_info.routes = infra_nic_routes(&pod_ip_info.pod_ip_config.ip_address, cidrs)?;
            pod_ip_info.skip_default_routes = true;
        }
        // TODO: compute routes for node network interface NICs once their
        // gateway scheme is defined
        NicType::BackendNic | NicType::AccelnetFrontendNic => {
            pod_ip_info.routes = Vec::new();
        }
        NicType::Unknown(tag) => return Err(RouteError::InvalidNicType(tag.clone())),
    }
    Ok(())
}

fn delegated_nic_routes() -> Vec<Route> {
    vec![
        // The gateway route must come first; the default route depends on it
        Route::direct(format!("{VIRTUAL_GATEWAY}/32")),
        Route::via("0.0.0.0/0", VIRTUAL_GATEWAY.to_string()),
    ]
}

fn infra_nic_routes<S>(ip_address: &str, cidrs: &S) -> Result<Vec<Route>, RouteError>
where
    S: CidrSource + ?Sized,
{
    let infra_vnet = load(CidrList::InfraVnet, cidrs.infra_vnet_cidrs())?;
    let pod = load(CidrList::Pod, cidrs.pod_cidrs())?;
    let service = load(CidrList::Service, cidrs.service_cidrs())?;

    let ip: IpAddr = ip_address.parse().map_err(|source| RouteError::InvalidPodIp {
        ip_address: ip_address.to_string(),
        source,
    })?;

    let mut routes = Vec::new();
    for list in [&pod, &service, &infra_vnet] {
        match ip {
            IpAddr::V4(_) => routes.extend(
                list.v4
                    .iter()
                    .map(|net| Route::via(net.to_string(), OVERLAY_GATEWAY_V4.to_string())),
            ),
            IpAddr::V6(_) => routes.extend(
                list.v6
                    .iter()
                    .map(|net| Route::via(net.to_string(), OVERLAY_GATEWAY_V6.to_string())),
            ),
        }
    }
    Ok(routes)
}

fn load(list: CidrList, raw: Result<String, ConfigError>) -> Result<CidrsByFamily, RouteError> {
    let raw = raw.map_err(|source| RouteError::Config { list, source })?;
    parse_cidrs(&raw).map_err(|source| RouteError::InvalidCidr { list, source })
}
