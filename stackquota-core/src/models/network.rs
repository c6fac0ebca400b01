//! Network resources listed to compute usage when the network service has no
//! native quota-detail report.

use serde::{Deserialize, Serialize};

/// A generic network resource (network, subnet, port, router, floating IP).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkResource {
    /// Resource ID.
    pub id: String,
    /// Display name, when the resource type has one.
    #[serde(default)]
    pub name: Option<String>,
    /// Owning tenant.
    #[serde(default, alias = "project_id")]
    pub tenant_id: Option<String>,
}

/// A security group with its rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    /// Group ID.
    pub id: String,
    /// Group name.
    #[serde(default)]
    pub name: Option<String>,
    /// Rules belonging to the group.
    #[serde(default)]
    pub security_group_rules: Vec<SecurityGroupRule>,
}

/// A single security group rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRule {
    /// Rule ID.
    pub id: String,
}
