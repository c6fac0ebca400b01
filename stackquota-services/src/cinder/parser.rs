//! Cinder response parsing.

use stackquota_core::{AbsoluteLimits, QuotaSet, ServiceKind};

use crate::endpoint::quota_set_from;
use crate::error::ServiceError;

/// Parses a `GET /limits` body.
///
/// Cinder answers in the same shape as Nova but only the `absolute` member
/// matters; a body without it is rejected.
pub fn parse_limits(body: &serde_json::Value) -> Result<AbsoluteLimits, ServiceError> {
    let absolute = body
        .get("limits")
        .and_then(|limits| limits.get("absolute"))
        .ok_or_else(|| ServiceError::parse(ServiceKind::Volume, "missing `limits.absolute`"))?;

    serde_json::from_value(absolute.clone())
        .map_err(|e| ServiceError::parse(ServiceKind::Volume, e.to_string()))
}

/// Parses a `GET /os-quota-sets/..` body.
///
/// Per-volume-type entries such as `volumes_lvmdriver-1` are kept; callers
/// filter to the fields they know.
pub fn parse_quota_set(body: &serde_json::Value) -> Result<QuotaSet, ServiceError> {
    quota_set_from(ServiceKind::Volume, body, "quota_set")
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
                    "maxTotalVolumes": 10,
                    "totalVolumesUsed": 4,
                    "maxTotalVolumeGigabytes": 1000,
                    "totalGigabytesUsed": 400,
                    "maxTotalSnapshots": 10,
                    "totalSnapshotsUsed": 0,
                    "maxTotalBackups": 10
                }
            }
        });

        let limits = parse_limits(&body).unwrap();
        assert_eq!(limits.len(), 7);
        assert_eq!(limits.used("totalGigabytesUsed"), Some(400));
    }

    #[test]
    fn test_parse_limits_missing_absolute() {
        let result = parse_limits(&json!({"limits": {"rate": []}}));
        assert!(matches!(result, Err(ServiceError::Parse { .. })));
    }

    #[test]
    fn test_parse_quota_set_with_volume_types() {
        let body = json!({
            "quota_set": {
                "id": "p-123",
                "volumes": 10,
                "gigabytes": 1000,
                "snapshots": 10,
                "volumes_lvmdriver-1": -1,
                "per_volume_gigabytes": -1
            }
        });

        let quotas = parse_quota_set(&body).unwrap();
        assert_eq!(quotas.get("volumes"), Some(Limit::Limited(10)));
        assert_eq!(quotas.get("volumes_lvmdriver-1"), Some(Limit::Unlimited));
    }
}
