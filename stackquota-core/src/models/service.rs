//! Backend services and the quota fields they own.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Quota fields owned by the compute service (Nova).
pub const NOVA_QUOTA_FIELDS: &[&str] = &[
    "metadata_items",
    "cores",
    "instances",
    "injected_files",
    "injected_file_content_bytes",
    "injected_file_path_bytes",
    "key_pairs",
    "ram",
    "server_groups",
    "server_group_members",
];

/// Quota fields owned by the block-storage service (Cinder).
pub const CINDER_QUOTA_FIELDS: &[&str] = &["volumes", "snapshots", "gigabytes"];

/// Quota fields owned by the network service (Neutron).
pub const NEUTRON_QUOTA_FIELDS: &[&str] = &[
    "network",
    "subnet",
    "port",
    "router",
    "floatingip",
    "security_group",
    "security_group_rule",
];

/// Every quota field known to `StackQuota`.
pub fn all_quota_fields() -> BTreeSet<&'static str> {
    ServiceKind::all()
        .iter()
        .flat_map(|service| service.quota_fields().iter().copied())
        .collect()
}

// ============================================================================
// Service Kind
// ============================================================================

/// A backend service that contributes quota fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    /// Compute (Nova).
    Compute,
    /// Block storage (Cinder).
    Volume,
    /// Networking (Neutron).
    Network,
}

impl ServiceKind {
    /// All services, in the order their results are merged.
    pub fn all() -> &'static [ServiceKind] {
        &[ServiceKind::Compute, ServiceKind::Network, ServiceKind::Volume]
    }

    /// The generic service name used by availability checks.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compute => "compute",
            Self::Volume => "volume",
            Self::Network => "network",
        }
    }

    /// The OpenStack project implementing this service.
    pub fn project_name(&self) -> &'static str {
        match self {
            Self::Compute => "Nova",
            Self::Volume => "Cinder",
            Self::Network => "Neutron",
        }
    }

    /// Quota fields owned by this service.
    pub fn quota_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Compute => NOVA_QUOTA_FIELDS,
            Self::Volume => CINDER_QUOTA_FIELDS,
            Self::Network => NEUTRON_QUOTA_FIELDS,
        }
    }

    /// Returns true if this service owns `field`.
    pub fn owns(&self, field: &str) -> bool {
        self.quota_fields().contains(&field)
    }

    /// Finds the service owning `field`.
    pub fn owner_of(field: &str) -> Option<ServiceKind> {
        Self::all().iter().copied().find(|service| service.owns(field))
    }

    /// Parses a service name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<ServiceKind> {
        match name.to_lowercase().as_str() {
            "compute" | "nova" => Some(Self::Compute),
            "volume" | "cinder" | "block-storage" => Some(Self::Volume),
            "network" | "neutron" => Some(Self::Network),
            _ => None,
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Service Availability
// ============================================================================

/// Which backend services are deployed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceAvailability {
    /// Compute is deployed.
    pub compute: bool,
    /// Block storage is deployed.
    pub volume: bool,
    /// Networking is deployed.
    pub network: bool,
}

impl ServiceAvailability {
    /// Returns whether `service` is deployed.
    pub fn is_enabled(&self, service: ServiceKind) -> bool {
        match service {
            ServiceKind::Compute => self.compute,
            ServiceKind::Volume => self.volume,
            ServiceKind::Network => self.network,
        }
    }

    /// Deployed services, in merge order.
    pub fn enabled(&self) -> impl Iterator<Item = ServiceKind> + '_ {
        ServiceKind::all()
            .iter()
            .copied()
            .filter(|service| self.is_enabled(*service))
    }
}
