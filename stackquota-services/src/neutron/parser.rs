//! Neutron response parsing.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use stackquota_core::{QuotaDetail, QuotaSet, ServiceKind};
use std::collections::{BTreeMap, BTreeSet};

use crate::endpoint::quota_set_from;
use crate::error::ServiceError;

#[derive(Debug, Deserialize)]
struct ExtensionsResponse {
    extensions: Vec<Extension>,
}

#[derive(Debug, Deserialize)]
struct Extension {
    alias: String,
}

#[derive(Debug, Deserialize)]
struct QuotaDetailsResponse {
    quota: BTreeMap<String, QuotaDetail>,
}

fn parse_error(e: &serde_json::Error) -> ServiceError {
    ServiceError::parse(ServiceKind::Network, e.to_string())
}

/// Parses `GET /v2.0/extensions` into the set of aliases.
pub fn parse_extensions(body: serde_json::Value) -> Result<BTreeSet<String>, ServiceError> {
    let parsed: ExtensionsResponse = serde_json::from_value(body).map_err(|e| parse_error(&e))?;
    Ok(parsed.extensions.into_iter().map(|ext| ext.alias).collect())
}

/// Parses `GET /v2.0/quotas/{t}` and `.../default`.
pub fn parse_quota_set(body: &serde_json::Value) -> Result<QuotaSet, ServiceError> {
    quota_set_from(ServiceKind::Network, body, "quota")
}

/// Parses `GET /v2.0/quotas/{t}/details`.
pub fn parse_quota_details(
    body: serde_json::Value,
) -> Result<BTreeMap<String, QuotaDetail>, ServiceError> {
    let parsed: QuotaDetailsResponse = serde_json::from_value(body).map_err(|e| parse_error(&e))?;
    Ok(parsed.quota)
}

/// Parses a resource listing such as `{"networks": [...]}`.
pub fn parse_list<T: DeserializeOwned>(
    body: &serde_json::Value,
    collection: &str,
) -> Result<Vec<T>, ServiceError> {
    let items = body.get(collection).ok_or_else(|| {
        ServiceError::parse(ServiceKind::Network, format!("missing `{collection}` list"))
    })?;
    serde_json::from_value(items.clone()).map_err(|e| parse_error(&e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stackquota_core::{Limit, NetworkResource, SecurityGroup};

    #[test]
    fn test_parse_extensions() {
        let body = json!({
            "extensions": [
                {"alias": "security-group", "name": "security-group", "description": ""},
                {"alias": "router", "name": "Neutron L3 Router"},
                {"alias": "quotas"}
            ]
        });

        let aliases = parse_extensions(body).unwrap();
        assert_eq!(aliases.len(), 3);
        assert!(aliases.contains("router"));
    }

    #[test]
    fn test_parse_quota_details() {
        let body = json!({
            "quota": {
                "network": {"limit": 10, "used": 3, "reserved": 1},
                "port": {"limit": -1, "used": 12, "reserved": 0}
            }
        });

        let details = parse_quota_details(body).unwrap();
        assert_eq!(details["network"].in_use(), 4);
        assert_eq!(details["port"].limit, Limit::Unlimited);
    }

    #[test]
    fn test_parse_quota_set() {
        let body = json!({"quota": {"network": 10, "floatingip": 50, "rbac_policy": -1}});
        let quotas = parse_quota_set(&body).unwrap();
        assert_eq!(quotas.get("floatingip"), Some(Limit::Limited(50)));
    }

    #[test]
    fn test_parse_network_list() {
        let body = json!({
            "networks": [
                {"id": "n1", "name": "private", "tenant_id": "t1", "status": "ACTIVE"},
                {"id": "n2", "project_id": "t1"}
            ]
        });

        let networks: Vec<NetworkResource> = parse_list(&body, "networks").unwrap();
        assert_eq!(networks.len(), 2);
        assert_eq!(networks[1].tenant_id.as_deref(), Some("t1"));
    }

    #[test]
    fn test_parse_security_groups_with_rules() {
        let body = json!({
            "security_groups": [
                {
                    "id": "sg1",
                    "name": "default",
                    "security_group_rules": [
                        {"id": "r1", "direction": "ingress"},
                        {"id": "r2", "direction": "egress"}
                    ]
                },
                {"id": "sg2", "name": "empty"}
            ]
        });

        let groups: Vec<SecurityGroup> = parse_list(&body, "security_groups").unwrap();
        let rules: usize = groups.iter().map(|g| g.security_group_rules.len()).sum();
        assert_eq!(groups.len(), 2);
        assert_eq!(rules, 2);
    }

    #[test]
    fn test_parse_list_missing_collection() {
        let result: Result<Vec<NetworkResource>, _> = parse_list(&json!({}), "ports");
        assert!(matches!(result, Err(ServiceError::Parse { .. })));
    }
}
