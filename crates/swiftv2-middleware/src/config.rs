//! Middleware configuration
//!
//! Settings are read from environment variables, the same way the agent's
//! other components are configured. CIDR lists are read on every route
//! computation through a [`CidrSource`], so changes to the source are picked
//! up without rebuilding the middleware.

use crate::error::ConfigError;
use std::env;
use std::fmt;
use std::str::FromStr;

/// Pod label marking a pod as SWIFT v2 multitenant
pub const DEFAULT_POD_NETWORK_LABEL: &str = "kubernetes.azure.com/pod-network";

/// Environment variable overriding the multitenancy pod label
pub const ENV_POD_NETWORK_LABEL: &str = "SWIFT_V2_POD_LABEL";
/// Environment variable selecting the [`RollbackPolicy`]
pub const ENV_ROLLBACK_POLICY: &str = "SWIFT_V2_ROLLBACK_POLICY";
/// Environment variable holding the infrastructure VNET CIDRs
pub const ENV_INFRA_VNET_CIDRS: &str = "INFRA_VNET_CIDRS";
/// Environment variable holding the pod CIDRs
pub const ENV_POD_CIDRS: &str = "POD_CIDRs";
/// Environment variable holding the service CIDRs
pub const ENV_SERVICE_CIDRS: &str = "SERVICE_CIDRS";

/// Whether to release the default allocation when the default handler itself fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RollbackPolicy {
    /// Release on every failure once a secondary interface is needed,
    /// including a failed default allocation
    #[default]
    ReleaseOnAnyFailure,

    /// Release only after the default handler has succeeded
    ReleaseAfterAllocation,
}

impl RollbackPolicy {
    /// Whether a failed default allocation should still be released
    #[must_use]
    pub fn releases_failed_allocation(self) -> bool {
        matches!(self, Self::ReleaseOnAnyFailure)
    }
}

impl FromStr for RollbackPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "any-failure" => Ok(Self::ReleaseOnAnyFailure),
            "after-allocation" => Ok(Self::ReleaseAfterAllocation),
            other => Err(ConfigError::InvalidValue {
                name: ENV_ROLLBACK_POLICY,
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for RollbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReleaseOnAnyFailure => f.write_str("any-failure"),
            Self::ReleaseAfterAllocation => f.write_str("after-allocation"),
        }
    }
}

/// Middleware settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MiddlewareConfig {
    /// Label whose presence marks a pod as multitenant
    pub pod_network_label: String,

    /// Rollback behaviour when the default handler fails
    pub rollback_policy: RollbackPolicy,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            pod_network_label: DEFAULT_POD_NETWORK_LABEL.to_string(),
            rollback_policy: RollbackPolicy::default(),
        }
    }
}

impl MiddlewareConfig {
    /// Load settings from the environment, falling back to defaults for unset variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(label) = lookup(ENV_POD_NETWORK_LABEL) {
            if label.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    name: ENV_POD_NETWORK_LABEL,
                    value: label,
                });
            }
            config.pod_network_label = label.trim().to_string();
        }

        if let Some(policy) = lookup(ENV_ROLLBACK_POLICY) {
            config.rollback_policy = policy.parse()?;
        }

        Ok(config)
    }
}

/// Source of the CIDR lists used for infra NIC routes
///
/// Each list is a comma-separated set of CIDRs and is retrieved
/// independently, so a failure names the list that could not be read.
pub trait CidrSource: Send + Sync {
    /// Infrastructure VNET CIDRs
    fn infra_vnet_cidrs(&self) -> Result<String, ConfigError>;

    /// Pod CIDRs
    fn pod_cidrs(&self) -> Result<String, ConfigError>;

    /// Service CIDRs
    fn service_cidrs(&self) -> Result<String, ConfigError>;
}

/// Reads CIDR lists from environment variables.
///
/// An unset variable is an error; a variable set to an empty string is an
/// empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCidrSource;

fn required_env(name: &'static str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::MissingVariable(name))
}

impl CidrSource for EnvCidrSource {
    fn infra_vnet_cidrs(&self) -> Result<String, ConfigError> {
        required_env(ENV_INFRA_VNET_CIDRS)
    }

    fn pod_cidrs(&self) -> Result<String, ConfigError> {
        required_env(ENV_POD_CIDRS)
    }

    fn service_cidrs(&self) -> Result<String, ConfigError> {
        required_env(ENV_SERVICE_CIDRS)
    }
}

/// Fixed CIDR lists, e.g. from a config file; `None` behaves like an unset variable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCidrs {
    /// Infrastructure VNET CIDRs
    pub infra_vnet: Option<String>,
    /// Pod CIDRs
    pub pod: Option<String>,
    /// Service CIDRs
    pub service: Option<String>,
}

impl StaticCidrs {
    /// All three lists set
    pub fn new(
        infra_vnet: impl Into<String>,
        pod: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            infra_vnet: Some(infra_vnet.into()),
            pod: Some(pod.into()),
            service: Some(service.into()),
        }
    }
}

impl CidrSource for StaticCidrs {
    fn infra_vnet_cidrs(&self) -> Result<String, ConfigError> {
        self.infra_vnet
            .clone()
            .ok_or(ConfigError::MissingVariable(ENV_INFRA_VNET_CIDRS))
    }

    fn pod_cidrs(&self) -> Result<String, ConfigError> {
        self.pod.clone().ok_or(ConfigError::MissingVariable(ENV_POD_CIDRS))
    }

    fn service_cidrs(&self) -> Result<String, ConfigError> {
        self.service
            .clone()
            .ok_or(ConfigError::MissingVariable(ENV_SERVICE_CIDRS))
    }
}
