//! Nova response parsing.

use serde::Deserialize;
use stackquota_core::{AbsoluteLimits, QuotaSet, ServiceKind};

use crate::endpoint::quota_set_from;
use crate::error::ServiceError;

#[derive(Debug, Deserialize)]
struct LimitsResponse {
    limits: LimitsBody,
}

#[derive(Debug, Deserialize)]
struct LimitsBody {
    #[serde(default)]
    absolute: AbsoluteLimits,
}

/// Parses a `GET /limits` body.
pub fn parse_limits(body: serde_json::Value) -> Result<AbsoluteLimits, ServiceError> {
    let parsed: LimitsResponse = serde_json::from_value(body)
        .map_err(|e| ServiceError::parse(ServiceKind::Compute, e.to_string()))?;
    Ok(parsed.limits.absolute)
}

/// Parses a `GET /os-quota-sets/..` body.
pub fn parse_quota_set(body: &serde_json::Value) -> Result<QuotaSet, ServiceError> {
    quota_set_from(ServiceKind::Compute, body, "quota_set")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stackquota_core::Limit;

    #[test]
    fn test_parse_limits() {
        let body = json!({
            "limits": {
                "rate": [],
                "absolute": {
                    "maxTotalInstances": 10,
                    "totalInstancesUsed": 2,
                    "maxTotalRAMSize": 51200,
                    "totalRAMUsed": 1024,
                    "maxImageMeta": 128,
                    "maxSecurityGroups": null
                }
            }
        });

        let limits = parse_limits(body).unwrap();
        assert_eq!(limits.limit("maxTotalInstances"), Some(Limit::Limited(10)));
        assert_eq!(limits.used("totalRAMUsed"), Some(1024));
        assert_eq!(limits.get("maxSecurityGroups"), None);
    }

    #[test]
    fn test_parse_limits_rejects_other_documents() {
        let result = parse_limits(json!({"quota_set": {}}));
        assert!(matches!(result, Err(ServiceError::Parse { .. })));
    }

    #[test]
    fn test_parse_quota_set() {
        let body = json!({
            "quota_set": {
                "id": "p-123",
                "cores": 20,
                "instances": 10,
                "ram": -1,
                "key_pairs": 100
            }
        });

        let quotas = parse_quota_set(&body).unwrap();
        assert_eq!(quotas.len(), 4);
        assert_eq!(quotas.get("ram"), Some(Limit::Unlimited));
        assert!(!quotas.contains("id"));
    }
}
