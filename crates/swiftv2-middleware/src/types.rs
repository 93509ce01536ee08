//! IP configs request and response types
//!
//! These are the shapes exchanged between the agent's request handlers.
//! Encoding them for the wire is the caller's concern.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result code carried in every response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ResponseCode {
    /// Request succeeded
    #[default]
    Success,

    /// Request was malformed
    InvalidRequest,

    /// Allocation failed after the default handler ran
    FailedToAllocateIpConfig,

    /// Validation-stage problem, including a not-ready MTPNC
    UnexpectedError,
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "Success",
            Self::InvalidRequest => "InvalidRequest",
            Self::FailedToAllocateIpConfig => "FailedToAllocateIPConfig",
            Self::UnexpectedError => "UnexpectedError",
        };
        f.write_str(s)
    }
}

/// Return code and message of a handler response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Response {
    /// Result code
    pub return_code: ResponseCode,

    /// Human-readable detail, empty on success
    #[serde(default)]
    pub message: String,
}

/// NIC type tag attached to every IP config
///
/// The set of known tags is closed; anything else is kept verbatim in
/// [`NicType::Unknown`] so that route computation can reject it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NicType {
    /// Node's primary interface, shared across pods
    #[default]
    InfraNic,
    /// Secondary virtual NIC delegated to a single pod
    DelegatedVmNic,
    /// Backend NIC of a node network interface
    BackendNic,
    /// Accelerated-networking frontend NIC of a node network interface
    AccelnetFrontendNic,
    /// Any tag this middleware does not know how to route
    Unknown(String),
}

impl NicType {
    /// Wire tag for this NIC type
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InfraNic => "InfraNIC",
            Self::DelegatedVmNic => "DelegatedVMNIC",
            Self::BackendNic => "BackendNIC",
            Self::AccelnetFrontendNic => "FrontendNIC_Accelnet",
            Self::Unknown(tag) => tag,
        }
    }
}

impl From<&str> for NicType {
    fn from(tag: &str) -> Self {
        match tag {
            "InfraNIC" => Self::InfraNic,
            "DelegatedVMNIC" => Self::DelegatedVmNic,
            "BackendNIC" => Self::BackendNic,
            "FrontendNIC_Accelnet" => Self::AccelnetFrontendNic,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl From<String> for NicType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<NicType> for String {
    fn from(nic_type: NicType) -> Self {
        nic_type.as_str().to_string()
    }
}

impl fmt::Display for NicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An IP address and its prefix length
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct IpSubnet {
    /// Address without prefix, e.g. "10.0.0.5"
    #[serde(rename = "IPAddress")]
    pub ip_address: String,

    /// Prefix length
    pub prefix_length: u8,
}

/// One routing table entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct Route {
    /// Destination CIDR
    #[serde(rename = "IPAddress")]
    pub ip_address: String,

    /// Next hop; empty for directly connected routes
    #[serde(rename = "GatewayIPAddress", default)]
    pub gateway_ip_address: String,
}

impl Route {
    /// Route via a gateway
    pub fn via(destination: impl Into<String>, gateway: impl Into<String>) -> Self {
        Self {
            ip_address: destination.into(),
            gateway_ip_address: gateway.into(),
        }
    }

    /// Directly connected route with no gateway
    pub fn direct(destination: impl Into<String>) -> Self {
        Self {
            ip_address: destination.into(),
            gateway_ip_address: String::new(),
        }
    }
}

/// IP configuration of one pod interface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct PodIpInfo {
    /// Interface address
    #[serde(rename = "PodIPConfig")]
    pub pod_ip_config: IpSubnet,

    /// Interface MAC address
    #[serde(default)]
    pub mac_address: String,

    /// NIC type tag
    #[serde(rename = "NICType")]
    pub nic_type: NicType,

    /// Interface name; empty for delegated NICs
    #[serde(default)]
    pub interface_name: String,

    /// Do not install the node's default routes on this interface
    #[serde(default)]
    pub skip_default_routes: bool,

    /// Routes for this interface, in programming order
    #[serde(default)]
    pub routes: Vec<Route>,
}

/// Response returned by an IP configs handler
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "PascalCase")]
pub struct IpConfigsResponse {
    /// Result code and message
    pub response: Response,

    /// One entry per pod interface
    #[serde(rename = "PodIPInfo", default)]
    pub pod_ip_info: Vec<PodIpInfo>,
}

impl IpConfigsResponse {
    /// A successful response with the given interfaces
    #[must_use]
    pub fn success(pod_ip_info: Vec<PodIpInfo>) -> Self {
        Self {
            response: Response::default(),
            pod_ip_info,
        }
    }

    /// A failed response with no interfaces
    pub fn failure(return_code: ResponseCode, message: impl Into<String>) -> Self {
        Self {
            response: Response {
                return_code,
                message: message.into(),
            },
            pod_ip_info: Vec::new(),
        }
    }
}

/// Incoming request to provision pod networking
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IpConfigsRequest {
    /// Opaque orchestrator context; for Kubernetes a JSON pod identity
    pub orchestrator_context: Vec<u8>,

    /// Specific IPs the caller asks for, if any
    pub desired_ip_addresses: Vec<String>,

    /// Interface ID of the pod
    pub pod_interface_id: String,

    /// Sandbox (infra) container ID
    pub infra_container_id: String,

    /// Set before the request reaches the default handler when the pod
    /// needs a delegated NIC
    pub secondary_interfaces_exist: bool,
}

impl IpConfigsRequest {
    /// Request carrying only an orchestrator context
    #[must_use]
    pub fn new(orchestrator_context: Vec<u8>) -> Self {
        Self {
            orchestrator_context,
            ..Default::default()
        }
    }
}

impl fmt::Display for IpConfigsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{OrchestratorContext:{} DesiredIPAddresses:{:?} PodInterfaceID:{} InfraContainerID:{} SecondaryInterfacesExist:{}}}",
            String::from_utf8_lossy(&self.orchestrator_context),
            self.desired_ip_addresses,
            self.pod_interface_id,
            self.infra_container_id,
            self.secondary_interfaces_exist,
        )
    }
}

/// Error decoding a pod identity from an orchestrator context
#[derive(Debug, Error)]
pub enum PodInfoError {
    /// Context is not the expected JSON object
    #[error("invalid orchestrator context: {0}")]
    Json(#[from] serde_json::Error),

    /// Context decoded but lacks a pod name or namespace
    #[error("orchestrator context is missing pod {0}")]
    MissingField(&'static str),
}

#[derive(Deserialize)]
struct KubernetesPodContext {
    #[serde(rename = "PodName", default)]
    pod_name: String,
    #[serde(rename = "PodNamespace", default)]
    pod_namespace: String,
}

/// Identity of the requesting pod
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodInfo {
    name: String,
    namespace: String,
    infra_container_id: String,
    interface_id: String,
}

impl PodInfo {
    /// Build a pod identity directly
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            infra_container_id: String::new(),
            interface_id: String::new(),
        }
    }

    /// Decode the pod identity carried by an IP configs request.
    ///
    /// Fails if the context is not JSON or if the name or namespace is empty,
    /// since neither can be looked up in the cluster.
    pub fn from_request(request: &IpConfigsRequest) -> Result<Self, PodInfoError> {
        let context: KubernetesPodContext = serde_json::from_slice(&request.orchestrator_context)?;
        if context.pod_name.is_empty() {
            return Err(PodInfoError::MissingField("name"));
        }
        if context.pod_namespace.is_empty() {
            return Err(PodInfoError::MissingField("namespace"));
        }
        Ok(Self {
            name: context.pod_name,
            namespace: context.pod_namespace,
            infra_container_id: request.infra_container_id.clone(),
            interface_id: request.pod_interface_id.clone(),
        })
    }

    /// Pod name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pod namespace
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Sandbox container ID from the request
    #[must_use]
    pub fn infra_container_id(&self) -> &str {
        &self.infra_container_id
    }

    /// Pod interface ID from the request
    #[must_use]
    pub fn interface_id(&self) -> &str {
        &self.interface_id
    }
}

impl fmt::Display for PodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.namespace, self.name)
    }
}
