//! Raw backend quota documents.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::limit::Limit;

// ============================================================================
// Absolute Limits
// ============================================================================

/// A backend's absolute-limits report for a tenant.
///
/// Keys follow the backend naming (`maxTotalInstances`, `totalInstancesUsed`,
/// `maxTotalVolumeGigabytes`, ...). Non-integer entries in the source document
/// are dropped on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, serde_json::Value>",
    into = "BTreeMap<String, i64>"
)]
pub struct AbsoluteLimits {
    values: BTreeMap<String, i64>,
}

impl AbsoluteLimits {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a raw value.
    pub fn insert(&mut self, key: impl Into<String>, value: i64) {
        self.values.insert(key.into(), value);
    }

    /// Returns the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.get(key).copied()
    }

    /// Returns `key` as a ceiling, normalizing negative values to unlimited.
    pub fn limit(&self, key: &str) -> Option<Limit> {
        self.get(key).map(Limit::from_raw)
    }

    /// Returns `key` as a usage count. Negative counts read as zero.
    pub fn used(&self, key: &str) -> Option<u64> {
        self.get(key).map(|raw| u64::try_from(raw).unwrap_or(0))
    }

    /// Copies every entry of `other` into this document, overwriting clashes.
    pub fn merge(&mut self, other: AbsoluteLimits) {
        self.values.extend(other.values);
    }

    /// Iterates over the raw entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl From<BTreeMap<String, serde_json::Value>> for AbsoluteLimits {
    fn from(raw: BTreeMap<String, serde_json::Value>) -> Self {
        let values = raw
            .into_iter()
            .filter_map(|(key, value)| value.as_i64().map(|v| (key, v)))
            .collect();
        Self { values }
    }
}

impl From<AbsoluteLimits> for BTreeMap<String, i64> {
    fn from(limits: AbsoluteLimits) -> Self {
        limits.values
    }
}

impl<K: Into<String>> FromIterator<(K, i64)> for AbsoluteLimits {
    fn from_iter<I: IntoIterator<Item = (K, i64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ============================================================================
// Quota Set
// ============================================================================

/// Quota ceilings per resource, without usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaSet {
    quotas: BTreeMap<String, Limit>,
}

impl QuotaSet {
    /// Creates an empty quota set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ceiling for `name`.
    pub fn insert(&mut self, name: impl Into<String>, limit: Limit) {
        self.quotas.insert(name.into(), limit);
    }

    /// Returns the ceiling for `name`.
    pub fn get(&self, name: &str) -> Option<Limit> {
        self.quotas.get(name).copied()
    }

    /// Returns true if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.quotas.contains_key(name)
    }

    /// Copies every entry of `other` into this set.
    pub fn merge(&mut self, other: QuotaSet) {
        self.quotas.extend(other.quotas);
    }

    /// Keeps only the entries for which `keep` returns true.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.quotas.retain(|name, _| keep(name));
    }

    /// Iterates over the entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Limit)> {
        self.quotas.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.quotas.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.quotas.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Limit)> for QuotaSet {
    fn from_iter<I: IntoIterator<Item = (K, Limit)>>(iter: I) -> Self {
        Self {
            quotas: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

// ============================================================================
// Quota Detail
// ============================================================================

/// Per-resource quota detail as reported by the network service's
/// `quota_details` extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaDetail {
    /// The ceiling.
    pub limit: Limit,
    /// Resources in use.
    #[serde(default)]
    pub used: u64,
    /// Resources reserved by in-flight requests.
    #[serde(default)]
    pub reserved: u64,
}

impl QuotaDetail {
    /// Usage counting reservations, which is what a new request competes with.
    pub fn in_use(&self) -> u64 {
        self.used.saturating_add(self.reserved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_limits_from_json() {
        let json = r#"{
            "maxTotalInstances": 10,
            "totalInstancesUsed": 2,
            "maxTotalRAMSize": -1,
            "maxImageMeta": null,
            "note": "ignored"
        }"#;
        let limits: AbsoluteLimits = serde_json::from_str(json).unwrap();

        assert_eq!(limits.len(), 3);
        assert_eq!(limits.limit("maxTotalInstances"), Some(Limit::Limited(10)));
        assert_eq!(limits.used("totalInstancesUsed"), Some(2));
        assert_eq!(limits.limit("maxTotalRAMSize"), Some(Limit::Unlimited));
        assert_eq!(limits.get("maxImageMeta"), None);
    }

    #[test]
    fn test_absolute_limits_merge() {
        let mut compute: AbsoluteLimits = [("maxTotalCores", 20), ("totalCoresUsed", 2)]
            .into_iter()
            .collect();
        let volume: AbsoluteLimits = [("maxTotalVolumes", 20)].into_iter().collect();
        compute.merge(volume);

        assert_eq!(compute.len(), 3);
        assert_eq!(compute.get("maxTotalVolumes"), Some(20));
    }

    #[test]
    fn test_quota_set_retain() {
        let mut quotas: QuotaSet = [
            ("network", Limit::Limited(10)),
            ("router", Limit::Limited(10)),
            ("floatingip", Limit::Unlimited),
        ]
        .into_iter()
        .collect();
        quotas.retain(|name| name != "router");

        assert!(!quotas.contains("router"));
        assert_eq!(quotas.get("floatingip"), Some(Limit::Unlimited));
    }

    #[test]
    fn test_quota_detail_counts_reservations() {
        let detail: QuotaDetail =
            serde_json::from_str(r#"{"limit": 50, "used": 3, "reserved": 1}"#).unwrap();
        assert_eq!(detail.in_use(), 4);
        assert_eq!(detail.limit, Limit::Limited(50));
    }
}
