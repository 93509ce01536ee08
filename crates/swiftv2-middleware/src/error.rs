//! Middleware error types.
//!
//! Each stage of the pipeline has its own error so callers can tell a
//! transient condition (cache miss, MTPNC not ready) from malformed data or a
//! contract mismatch. [`HandlerError`] is what handlers return and knows how
//! to render itself as the caller-visible response.

use crate::cidr::InvalidCidr;
use crate::context::Cancelled;
use crate::types::{IpConfigsResponse, ResponseCode};
use cluster_cache::CacheError;
use std::fmt;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("environment variable {0} is not set")]
    MissingVariable(&'static str),

    /// Variable is set to a value that cannot be used
    #[error("invalid value {value:?} for {name}")]
    InvalidValue {
        /// Variable name
        name: &'static str,
        /// Rejected value
        value: String,
    },
}

/// Errors turning a pod's MTPNC into an IP config
#[derive(Debug, Error)]
pub enum IpConfigError {
    /// MTPNC lookup failed (including not found)
    #[error("failed to get pod's mtpnc from cache: {0}")]
    Cache(#[from] CacheError),

    /// MTPNC exists but the reconciler has not filled in its status yet
    #[error("mtpnc is not ready")]
    NotReady,

    /// `primaryIP` is not a CIDR
    #[error("failed to parse mtpnc primaryIP {primary_ip}: {source}")]
    ParsePrimaryIp {
        /// Raw `primaryIP` value
        primary_ip: String,
        /// Parse failure
        #[source]
        source: ipnet::AddrParseError,
    },

    /// `primaryIP` is not a host prefix
    #[error("invalid prefix length for mtpnc primaryIP, must be 32 (128 for IPv6): mtpnc primaryIP prefix length is {0}")]
    InvalidPrefixLength(u8),

    /// Request was cancelled during the lookup
    #[error(transparent)]
    Cancelled(#[from] Cancelled),
}

impl IpConfigError {
    /// Whether retrying later may succeed once the cluster state converges
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Cache(_) | Self::NotReady)
    }
}

/// Which CIDR list a route computation failed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CidrList {
    /// Infrastructure VNET CIDRs
    InfraVnet,
    /// Pod CIDRs
    Pod,
    /// Service CIDRs
    Service,
}

impl fmt::Display for CidrList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InfraVnet => f.write_str("infraVNETCIDRs"),
            Self::Pod => f.write_str("podCIDRs"),
            Self::Service => f.write_str("serviceCIDRs"),
        }
    }
}

/// Errors computing routes for an interface
#[derive(Debug, Error)]
pub enum RouteError {
    /// CIDR list could not be read
    #[error("failed to get {list}: {source}")]
    Config {
        /// List that failed
        list: CidrList,
        /// Underlying error
        #[source]
        source: ConfigError,
    },

    /// CIDR list contains an invalid entry
    #[error("failed to parse {list}: {source}")]
    InvalidCidr {
        /// List that failed
        list: CidrList,
        /// Offending entry
        #[source]
        source: InvalidCidr,
    },

    /// Interface address is not an IP address
    #[error("failed to parse podIPConfig IP address {ip_address}: {source}")]
    InvalidPodIp {
        /// Raw address
        ip_address: String,
        /// Parse failure
        #[source]
        source: std::net::AddrParseError,
    },

    /// NIC type this middleware cannot route
    #[error("invalid NIC type {0:?} for SWIFT v2 scenario")]
    InvalidNicType(String),
}

/// Validation outcome other than success, as returned by the request validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Result code to surface
    pub return_code: ResponseCode,
    /// Detail for the caller
    pub message: String,
}

impl ValidationFailure {
    pub(crate) fn unexpected(message: impl Into<String>) -> Self {
        Self {
            return_code: ResponseCode::UnexpectedError,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.return_code, self.message)
    }
}

impl std::error::Error for ValidationFailure {}

/// Error returned by an IP configs handler
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Request was rejected before any allocation happened
    #[error("failed to validate ip configs request: {0}")]
    Validation(#[from] ValidationFailure),

    /// Delegated NIC IP config could not be resolved after allocation
    #[error("failed to get SWIFTv2 IP config : {request}")]
    IpConfig {
        /// Request as received
        request: String,
        /// Underlying error
        #[source]
        source: IpConfigError,
    },

    /// Routes could not be computed for one of the interfaces
    #[error("failed to set routes for pod {pod}")]
    Routes {
        /// Pod the routes were for
        pod: String,
        /// Request as received
        request: String,
        /// Underlying error
        #[source]
        source: RouteError,
    },

    /// A wrapped handler failed; carries the response it produced
    #[error("{message}")]
    Downstream {
        /// Response produced by the failing handler
        response: IpConfigsResponse,
        /// Failure detail
        message: String,
    },

    /// Request was cancelled before it completed
    #[error("request cancelled")]
    Cancelled,
}

impl From<Cancelled> for HandlerError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl HandlerError {
    /// A downstream failure with the response the handler produced
    pub fn downstream(response: IpConfigsResponse, message: impl Into<String>) -> Self {
        Self::Downstream {
            response,
            message: message.into(),
        }
    }

    /// The response to hand back to the caller alongside this error
    #[must_use]
    pub fn response(&self) -> IpConfigsResponse {
        match self {
            Self::Validation(failure) => {
                IpConfigsResponse::failure(failure.return_code, failure.message.clone())
            }
            Self::IpConfig { request, source } => IpConfigsResponse::failure(
                ResponseCode::FailedToAllocateIpConfig,
                format!("AllocateIPConfig failed: {source}, IP config request is {request}"),
            ),
            Self::Routes {
                request, source, ..
            } => IpConfigsResponse::failure(
                ResponseCode::FailedToAllocateIpConfig,
                format!("AllocateIPConfig failed: {source}, IP config request is {request}"),
            ),
            Self::Downstream { response, .. } => response.clone(),
            Self::Cancelled => {
                IpConfigsResponse::failure(ResponseCode::UnexpectedError, "request cancelled")
            }
        }
    }

    /// Result code of [`HandlerError::response`]
    #[must_use]
    pub fn return_code(&self) -> ResponseCode {
        match self {
            Self::Validation(failure) => failure.return_code,
            Self::IpConfig { .. } | Self::Routes { .. } => ResponseCode::FailedToAllocateIpConfig,
            Self::Downstream { response, .. } => response.response.return_code,
            Self::Cancelled => ResponseCode::UnexpectedError,
        }
    }
}
