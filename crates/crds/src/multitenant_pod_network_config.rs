//! MultitenantPodNetworkConfig CRD
//!
//! Describes the secondary (delegated) network identity assigned to a single
//! pod. The object shares its namespace and name with the pod it belongs to.
//! Status fields are filled in by an external reconciler and may lag behind
//! pod creation, so an empty field is a normal transient state.

use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(CustomResource, Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
#[kube(
    group = "multitenancy.acn.azure.com",
    version = "v1alpha1",
    kind = "MultitenantPodNetworkConfig",
    shortname = "mtpnc",
    namespaced,
    status = "MultitenantPodNetworkConfigStatus"
)]
#[serde(rename_all = "camelCase")]
pub struct MultitenantPodNetworkConfigSpec {
    /// Name of the PodNetwork the pod is attached to
    pub pod_network: String,

    /// PodNetworkInstance the pod's network reservation comes from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_network_instance: Option<String>,

    /// Name of the owning pod
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq, Eq)]
pub struct MultitenantPodNetworkConfigStatus {
    /// Primary IP of the delegated interface, in CIDR notation (e.g. "10.0.0.5/32")
    #[serde(rename = "primaryIP", default, skip_serializing_if = "String::is_empty")]
    pub primary_ip: String,

    /// MAC address of the delegated interface
    #[serde(rename = "macAddress", default, skip_serializing_if = "String::is_empty")]
    pub mac_address: String,

    /// Network container ID backing the interface
    #[serde(rename = "ncID", default, skip_serializing_if = "String::is_empty")]
    pub ncid: String,

    /// Gateway IP for the delegated subnet
    #[serde(rename = "gatewayIP", default, skip_serializing_if = "String::is_empty")]
    pub gateway_ip: String,

    /// NIC type tag (e.g. "DelegatedVMNIC", "InfraNIC")
    #[serde(rename = "nicType", default, skip_serializing_if = "String::is_empty")]
    pub nic_type: String,
}

impl MultitenantPodNetworkConfigStatus {
    /// Returns true once every field needed to configure the interface is populated.
    ///
    /// Readiness is all-or-nothing: a single empty field means the reconciler
    /// has not finished provisioning.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        !self.primary_ip.is_empty()
            && !self.mac_address.is_empty()
            && !self.ncid.is_empty()
            && !self.gateway_ip.is_empty()
            && !self.nic_type.is_empty()
    }
}

impl MultitenantPodNetworkConfig {
    /// Returns true if the resource has a fully populated status.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status
            .as_ref()
            .is_some_and(MultitenantPodNetworkConfigStatus::is_ready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn ready_status() -> MultitenantPodNetworkConfigStatus {
        MultitenantPodNetworkConfigStatus {
            primary_ip: "10.0.0.5/32".to_string(),
            mac_address: "00:0d:3a:12:34:56".to_string(),
            ncid: "a1b2c3d4".to_string(),
            gateway_ip: "10.0.0.1".to_string(),
            nic_type: "DelegatedVMNIC".to_string(),
        }
    }

    fn mtpnc(status: Option<MultitenantPodNetworkConfigStatus>) -> MultitenantPodNetworkConfig {
        MultitenantPodNetworkConfig {
            metadata: ObjectMeta {
                name: Some("pod-a".to_string()),
                namespace: Some("tenant-a".to_string()),
                ..Default::default()
            },
            spec: MultitenantPodNetworkConfigSpec {
                pod_network: "pn-1".to_string(),
                ..Default::default()
            },
            status,
        }
    }

    #[test]
    fn test_fully_populated_status_is_ready() {
        assert!(ready_status().is_ready());
        assert!(mtpnc(Some(ready_status())).is_ready());
    }

    #[test]
    fn test_any_empty_field_is_not_ready() {
        let clears: [fn(&mut MultitenantPodNetworkConfigStatus); 5] = [
            |s| s.primary_ip.clear(),
            |s| s.mac_address.clear(),
            |s| s.ncid.clear(),
            |s| s.gateway_ip.clear(),
            |s| s.nic_type.clear(),
        ];
        for clear in clears {
            let mut status = ready_status();
            clear(&mut status);
            assert!(!status.is_ready(), "status with an empty field should not be ready: {status:?}");
        }
    }

    #[test]
    fn test_readiness_ignores_field_values() {
        // Garbage values are still "ready"; validating them is the resolver's job
        let status = MultitenantPodNetworkConfigStatus {
            primary_ip: "not-an-ip".to_string(),
            mac_address: "x".to_string(),
            ncid: "y".to_string(),
            gateway_ip: "z".to_string(),
            nic_type: "SomethingElse".to_string(),
        };
        assert!(status.is_ready());
        assert_eq!(status.is_ready(), status.is_ready());
    }

    #[test]
    fn test_missing_status_is_not_ready() {
        assert!(!mtpnc(None).is_ready());
        assert!(!mtpnc(Some(MultitenantPodNetworkConfigStatus::default())).is_ready());
    }

    #[test]
    fn test_status_deserializes_from_wire_names() {
        let json = serde_json::json!({
            "primaryIP": "10.0.0.5/32",
            "macAddress": "00:0d:3a:12:34:56",
            "ncID": "a1b2c3d4",
            "gatewayIP": "10.0.0.1",
            "nicType": "DelegatedVMNIC"
        });
        let status: MultitenantPodNetworkConfigStatus =
            serde_json::from_value(json).expect("status should deserialize");
        assert_eq!(status, ready_status());
    }

    #[test]
    fn test_partial_status_deserializes_as_not_ready() {
        let json = serde_json::json!({ "macAddress": "00:0d:3a:12:34:56" });
        let status: MultitenantPodNetworkConfigStatus =
            serde_json::from_value(json).expect("partial status should deserialize");
        assert!(!status.is_ready());
    }
}
