//! Test utilities for unit testing the middleware
//!
//! This module provides helpers for creating test objects and recording handlers.

use crate::config::DEFAULT_POD_NETWORK_LABEL;
use crate::context::RequestContext;
use crate::error::HandlerError;
use crate::handler::IpConfigsHandler;
use crate::types::{IpConfigsRequest, IpConfigsResponse, IpSubnet, NicType, PodIpInfo, ResponseCode};
use crds::{MultitenantPodNetworkConfig, MultitenantPodNetworkConfigSpec, MultitenantPodNetworkConfigStatus};
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use std::collections::BTreeMap;
use std::sync::Mutex;

pub const LABEL: &str = DEFAULT_POD_NETWORK_LABEL;

/// Helper to create a test pod, optionally carrying the multitenancy label
pub fn pod(namespace: &str, name: &str, multitenant: bool) -> Pod {
    let mut labels = BTreeMap::new();
    labels.insert("app".to_string(), "web".to_string());
    if multitenant {
        labels.insert(LABEL.to_string(), "pn-1".to_string());
    }
    Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Helper to create a test MTPNC with a fully populated status
pub fn ready_mtpnc(namespace: &str, name: &str, primary_ip: &str, nic_type: &str) -> MultitenantPodNetworkConfig {
    MultitenantPodNetworkConfig {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(namespace.to_string()),
            ..Default::default()
        },
        spec: MultitenantPodNetworkConfigSpec {
            pod_network: "pn-1".to_string(),
            pod_name: Some(name.to_string()),
            ..Default::default()
        },
        status: Some(MultitenantPodNetworkConfigStatus {
            primary_ip: primary_ip.to_string(),
            mac_address: "00:0d:3a:12:34:56".to_string(),
            ncid: "a1b2c3d4-0000-0000-0000-000000000000".to_string(),
            gateway_ip: "10.0.0.1".to_string(),
            nic_type: nic_type.to_string(),
        }),
    }
}

/// Helper to create an IP configs request for a pod
pub fn request_for(namespace: &str, name: &str) -> IpConfigsRequest {
    let context = format!(r#"{{"PodName":"{name}","PodNamespace":"{namespace}"}}"#);
    IpConfigsRequest {
        orchestrator_context: context.into_bytes(),
        pod_interface_id: format!("{name}-eth0"),
        infra_container_id: format!("{name}-sandbox"),
        ..Default::default()
    }
}

/// Helper to create an IP config as the default handler would return it
pub fn infra_ip_info(ip_address: &str, prefix_length: u8) -> PodIpInfo {
    PodIpInfo {
        pod_ip_config: IpSubnet {
            ip_address: ip_address.to_string(),
            prefix_length,
        },
        mac_address: "00:0d:3a:aa:bb:cc".to_string(),
        nic_type: NicType::InfraNic,
        interface_name: "eth0".to_string(),
        ..Default::default()
    }
}

/// Handler that records every request and answers with a fixed outcome
#[derive(Debug)]
pub struct RecordingHandler {
    outcome: Result<IpConfigsResponse, (ResponseCode, String)>,
    requests: Mutex<Vec<IpConfigsRequest>>,
}

impl RecordingHandler {
    /// Succeeds with the given interfaces
    pub fn succeeding(pod_ip_info: Vec<PodIpInfo>) -> Self {
        Self {
            outcome: Ok(IpConfigsResponse::success(pod_ip_info)),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Fails with the given code and message
    pub fn failing(return_code: ResponseCode, message: &str) -> Self {
        Self {
            outcome: Err((return_code, message.to_string())),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<IpConfigsRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests received so far
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl IpConfigsHandler for RecordingHandler {
    async fn handle(
        &self,
        _ctx: &RequestContext,
        request: IpConfigsRequest,
    ) -> Result<IpConfigsResponse, HandlerError> {
        self.requests.lock().unwrap().push(request);
        match &self.outcome {
            Ok(response) => Ok(response.clone()),
            Err((return_code, message)) => Err(HandlerError::downstream(
                IpConfigsResponse::failure(*return_code, message.clone()),
                message.clone(),
            )),
        }
    }
}
