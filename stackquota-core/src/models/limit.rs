//! Quota values and per-resource usage.
//!
//! Backends report "no limit" as a negative number. [`Limit`] normalizes that
//! convention into an explicit [`Limit::Unlimited`] variant so that nothing
//! downstream has to remember which sentinel means infinity.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Limit
// ============================================================================

/// A quota ceiling: either a finite amount or unlimited.
///
/// Serializes as an integer, using `-1` for unlimited, so documents written
/// by `StackQuota` read the same way backend documents do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Limit {
    /// A finite ceiling.
    Limited(u64),
    /// No ceiling.
    Unlimited,
}

impl Limit {
    /// Converts a raw backend value; any negative number means unlimited.
    pub fn from_raw(raw: i64) -> Self {
        u64::try_from(raw).map_or(Limit::Unlimited, Limit::Limited)
    }

    /// Returns true if there is no ceiling.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Limit::Unlimited)
    }

    /// Returns the finite value, if any.
    pub fn finite(&self) -> Option<u64> {
        match self {
            Limit::Limited(value) => Some(*value),
            Limit::Unlimited => None,
        }
    }

    /// Returns the value as a float, with unlimited mapped to positive infinity.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> f64 {
        match self {
            Limit::Limited(value) => *value as f64,
            Limit::Unlimited => f64::INFINITY,
        }
    }

    /// Headroom left after `used`, never below zero.
    pub fn remaining_after(&self, used: u64) -> Limit {
        match self {
            Limit::Limited(value) => Limit::Limited(value.saturating_sub(used)),
            Limit::Unlimited => Limit::Unlimited,
        }
    }
}

impl From<i64> for Limit {
    fn from(raw: i64) -> Self {
        Limit::from_raw(raw)
    }
}

impl From<Limit> for i64 {
    fn from(limit: Limit) -> Self {
        match limit {
            Limit::Limited(value) => i64::try_from(value).unwrap_or(i64::MAX),
            Limit::Unlimited => -1,
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Limited(value) => write!(f, "{value}"),
            Limit::Unlimited => write!(f, "unlimited"),
        }
    }
}

// ============================================================================
// Resource Quota
// ============================================================================

/// Quota, usage, and availability of a single resource for one tenant.
///
/// Resources that have no usage concept (key pairs, metadata items, injected
/// files) carry only `quota`; `used` and `available` are then `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuota {
    /// The ceiling for this resource.
    pub quota: Limit,
    /// Amount currently consumed (including reservations where the backend
    /// reports them).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
    /// Amount still available. Unlimited whenever `quota` is.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<Limit>,
}

impl ResourceQuota {
    /// A resource that only has a ceiling.
    pub fn quota_only(quota: Limit) -> Self {
        Self {
            quota,
            used: None,
            available: None,
        }
    }

    /// A resource with usage. Availability is `quota - used` clamped at
    /// zero, or unlimited when the quota is.
    pub fn with_usage(quota: Limit, used: u64) -> Self {
        Self {
            quota,
            used: Some(used),
            available: Some(quota.remaining_after(used)),
        }
    }

    /// Returns true if the quota is unlimited.
    pub fn is_unlimited(&self) -> bool {
        self.quota.is_unlimited()
    }

    /// Returns the percentage of the quota in use, when it is meaningful.
    ///
    /// `None` for quota-only resources and unlimited quotas. A zero quota with
    /// any usage reports 100%.
    #[allow(clippy::cast_precision_loss)]
    pub fn usage_percent(&self) -> Option<f64> {
        let used = self.used?;
        let quota = self.quota.finite()?;
        if quota == 0 {
            return Some(if used == 0 { 0.0 } else { 100.0 });
        }
        Some((used as f64 / quota as f64) * 100.0)
    }

    /// Returns true if nothing more can be allocated.
    pub fn is_exhausted(&self) -> bool {
        matches!(self.available, Some(Limit::Limited(0)))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_raw_is_unlimited() {
        assert_eq!(Limit::from_raw(-1), Limit::Unlimited);
        assert_eq!(Limit::from_raw(-42), Limit::Unlimited);
        assert_eq!(Limit::from_raw(0), Limit::Limited(0));
        assert_eq!(Limit::from_raw(10), Limit::Limited(10));
    }

    #[test]
    fn test_limit_serde_uses_backend_convention() {
        let parsed: Limit = serde_json::from_str("-1").unwrap();
        assert!(parsed.is_unlimited());
        assert_eq!(serde_json::to_string(&Limit::Unlimited).unwrap(), "-1");
        assert_eq!(serde_json::to_string(&Limit::Limited(20)).unwrap(), "20");
    }

    #[test]
    fn test_unlimited_as_infinity() {
        assert!(Limit::Unlimited.as_f64().is_infinite());
        assert_eq!(Limit::Limited(5).as_f64(), 5.0);
        assert_eq!(Limit::Unlimited.to_string(), "unlimited");
    }

    #[test]
    fn test_available_computed_and_clamped() {
        let ram = ResourceQuota::with_usage(Limit::Limited(10000), 1024);
        assert_eq!(ram.available, Some(Limit::Limited(8976)));

        // Over quota never reports negative availability
        let volumes = ResourceQuota::with_usage(Limit::Limited(1), 4);
        assert_eq!(volumes.available, Some(Limit::Limited(0)));
        assert!(volumes.is_exhausted());
    }

    #[test]
    fn test_unlimited_quota_has_unlimited_availability() {
        let ram = ResourceQuota::with_usage(Limit::Unlimited, 1024);
        assert_eq!(ram.quota, Limit::Unlimited);
        assert_eq!(ram.available, Some(Limit::Unlimited));
        assert_eq!(ram.used, Some(1024));
        assert_eq!(ram.usage_percent(), None);
    }

    #[test]
    fn test_quota_only_resource() {
        let key_pairs = ResourceQuota::quota_only(Limit::Limited(100));
        assert_eq!(key_pairs.used, None);
        assert_eq!(key_pairs.available, None);
        assert_eq!(key_pairs.usage_percent(), None);

        let json = serde_json::to_value(key_pairs).unwrap();
        assert_eq!(json, serde_json::json!({"quota": 100}));
    }

    #[test]
    fn test_usage_percent() {
        let instances = ResourceQuota::with_usage(Limit::Limited(10), 2);
        assert_eq!(instances.usage_percent(), Some(20.0));

        let zero = ResourceQuota::with_usage(Limit::Limited(0), 1);
        assert_eq!(zero.usage_percent(), Some(100.0));
    }
}
