//! Deployment feature switches consulted when deciding which quotas apply.

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Feature switches for quota reporting.
///
/// All switches default to enabled; turning one off hides the matching
/// resources even when the backend supports them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaSettings {
    /// Whether compute quotas are managed at all.
    #[serde(default = "default_true")]
    pub nova_quotas_enabled: bool,

    /// Network service switches.
    #[serde(default)]
    pub neutron: NeutronSettings,
}

impl Default for QuotaSettings {
    fn default() -> Self {
        Self {
            nova_quotas_enabled: true,
            neutron: NeutronSettings::default(),
        }
    }
}

/// Network service switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeutronSettings {
    /// Routers (and therefore floating IPs) are offered.
    #[serde(default = "default_true")]
    pub enable_router: bool,

    /// Network quotas are managed.
    #[serde(default = "default_true")]
    pub enable_quotas: bool,

    /// Floating IPs are offered.
    #[serde(default = "default_true")]
    pub enable_floating_ip: bool,
}

impl Default for NeutronSettings {
    fn default() -> Self {
        Self {
            enable_router: true,
            enable_quotas: true,
            enable_floating_ip: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_switches_default_on() {
        let settings: QuotaSettings =
            serde_json::from_str(r#"{"neutron": {"enable_router": false}}"#).unwrap();
        assert!(settings.nova_quotas_enabled);
        assert!(!settings.neutron.enable_router);
        assert!(settings.neutron.enable_quotas);
        assert!(settings.neutron.enable_floating_ip);
    }
}
