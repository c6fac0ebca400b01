//! Registry of the backend services quota reporting depends on.
//!
//! Each descriptor names the catalog service types a service may be
//! published under. Clouds disagree on these (`volumev3` vs `block-storage`),
//! so lookups try them in order.

use stackquota_core::ServiceKind;
use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// Descriptor
// ============================================================================

/// Static description of one backend service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Which service this is.
    pub kind: ServiceKind,
    /// The OpenStack project implementing it.
    pub project_name: &'static str,
    /// Catalog service types, most preferred first.
    pub service_types: &'static [&'static str],
    /// Names accepted on the command line.
    pub aliases: &'static [&'static str],
    /// One-line description.
    pub description: &'static str,
}

impl ServiceDescriptor {
    /// Quota fields this service owns.
    pub fn quota_fields(&self) -> &'static [&'static str] {
        self.kind.quota_fields()
    }
}

// ============================================================================
// Static Registry
// ============================================================================

static DESCRIPTORS: OnceLock<Vec<ServiceDescriptor>> = OnceLock::new();

static NAME_MAP: OnceLock<HashMap<&'static str, ServiceKind>> = OnceLock::new();

fn init_descriptors() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor {
            kind: ServiceKind::Compute,
            project_name: "Nova",
            service_types: &["compute"],
            aliases: &["compute", "nova"],
            description: "Instances, cores, RAM, key pairs, and server groups",
        },
        ServiceDescriptor {
            kind: ServiceKind::Network,
            project_name: "Neutron",
            service_types: &["network"],
            aliases: &["network", "neutron"],
            description: "Networks, subnets, ports, routers, floating IPs, and security groups",
        },
        ServiceDescriptor {
            kind: ServiceKind::Volume,
            project_name: "Cinder",
            service_types: &["volumev3", "block-storage", "volumev2", "volume"],
            aliases: &["volume", "cinder", "block-storage"],
            description: "Volumes, snapshots, and gigabytes",
        },
    ]
}

fn build_name_map(descriptors: &[ServiceDescriptor]) -> HashMap<&'static str, ServiceKind> {
    descriptors
        .iter()
        .flat_map(|desc| desc.aliases.iter().map(move |alias| (*alias, desc.kind)))
        .collect()
}

/// Global registry of backend service descriptors.
pub struct ServiceRegistry;

impl ServiceRegistry {
    /// All descriptors, in merge order.
    pub fn all() -> &'static [ServiceDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Descriptor for `kind`.
    ///
    /// Every [`ServiceKind`] is registered, so this always succeeds.
    pub fn get(kind: ServiceKind) -> &'static ServiceDescriptor {
        let all = Self::all();
        all.iter()
            .find(|d| d.kind == kind)
            .unwrap_or(&all[0])
    }

    /// Looks up a descriptor by command-line name.
    pub fn get_by_name(name: &str) -> Option<&'static ServiceDescriptor> {
        let map = NAME_MAP.get_or_init(|| build_name_map(Self::all()));
        let kind = map.get(name.to_ascii_lowercase().as_str())?;
        Some(Self::get(*kind))
    }

    /// Catalog service types for `kind`.
    pub fn service_types(kind: ServiceKind) -> &'static [&'static str] {
        Self::get(kind).service_types
    }
}
