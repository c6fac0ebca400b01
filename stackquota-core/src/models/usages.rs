//! The aggregated per-tenant quota usage snapshot.
//!
//! A [`QuotaUsages`] is assembled once through a [`QuotaUsagesBuilder`] and is
//! read-only afterwards. The builder mirrors how backends report data: a
//! ceiling first, then one or more usage tallies. Availability is derived in
//! [`QuotaUsagesBuilder::build`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::limit::{Limit, ResourceQuota};

// ============================================================================
// Quota Usages
// ============================================================================

/// Quota, usage, and availability per resource name for one tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaUsages {
    usages: BTreeMap<String, ResourceQuota>,
}

impl QuotaUsages {
    /// Starts a new builder.
    pub fn builder() -> QuotaUsagesBuilder {
        QuotaUsagesBuilder::new()
    }

    /// Returns the entry for `name`.
    pub fn get(&self, name: &str) -> Option<&ResourceQuota> {
        self.usages.get(name)
    }

    /// Returns true if `name` is present.
    pub fn contains(&self, name: &str) -> bool {
        self.usages.contains_key(name)
    }

    /// Iterates over the entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResourceQuota)> {
        self.usages.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resource names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.usages.keys().map(String::as_str)
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.usages.len()
    }

    /// Returns true if no resource is present.
    pub fn is_empty(&self) -> bool {
        self.usages.is_empty()
    }

    /// Resources with nothing left to allocate.
    pub fn exhausted(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, usage)| usage.is_exhausted())
            .map(|(name, _)| name)
    }
}

impl<'a> IntoIterator for &'a QuotaUsages {
    type Item = (&'a String, &'a ResourceQuota);
    type IntoIter = std::collections::btree_map::Iter<'a, String, ResourceQuota>;

    fn into_iter(self) -> Self::IntoIter {
        self.usages.iter()
    }
}

// ============================================================================
// Builder
// ============================================================================

#[derive(Debug, Clone, Copy)]
struct PendingQuota {
    quota: Limit,
    used: Option<u64>,
}

/// Accumulates ceilings and usage before freezing them into [`QuotaUsages`].
#[derive(Debug, Clone, Default)]
pub struct QuotaUsagesBuilder {
    pending: BTreeMap<String, PendingQuota>,
}

impl QuotaUsagesBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the ceiling for `name`, replacing any previous entry.
    pub fn add_quota(&mut self, name: impl Into<String>, quota: Limit) -> &mut Self {
        self.pending.insert(
            name.into(),
            PendingQuota {
                quota,
                used: None,
            },
        );
        self
    }

    /// Adds `used` to the running usage of `name`.
    ///
    /// Tallies for a name without a recorded ceiling are ignored: usage only
    /// makes sense against a quota.
    pub fn tally(&mut self, name: &str, used: u64) -> &mut Self {
        if let Some(entry) = self.pending.get_mut(name) {
            entry.used = Some(entry.used.unwrap_or(0).saturating_add(used));
        }
        self
    }

    /// Records a ceiling and its usage in one step.
    pub fn add_limit_and_usage(
        &mut self,
        name: impl Into<String>,
        quota: Limit,
        used: u64,
    ) -> &mut Self {
        let name = name.into();
        self.add_quota(name.clone(), quota);
        self.tally(&name, used)
    }

    /// Returns true if `name` has been recorded.
    pub fn contains(&self, name: &str) -> bool {
        self.pending.contains_key(name)
    }

    /// Drops every entry for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) -> &mut Self {
        self.pending.retain(|name, _| keep(name));
        self
    }

    /// Moves every entry of `other` into this builder.
    pub fn merge(&mut self, other: QuotaUsagesBuilder) -> &mut Self {
        self.pending.extend(other.pending);
        self
    }

    /// Settles availability and freezes the snapshot.
    pub fn build(self) -> QuotaUsages {
        let usages = self
            .pending
            .into_iter()
            .map(|(name, pending)| {
                let quota = match pending.used {
                    Some(used) => ResourceQuota::with_usage(pending.quota, used),
                    None => ResourceQuota::quota_only(pending.quota),
                };
                (name, quota)
            })
            .collect();

        QuotaUsages { usages }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_settles_availability() {
        let mut builder = QuotaUsages::builder();
        builder
            .add_limit_and_usage("instances", Limit::Limited(10), 2)
            .add_quota("key_pairs", Limit::Limited(100));
        let usages = builder.build();

        assert_eq!(usages.len(), 2);
        assert_eq!(
            usages.get("instances").unwrap().available,
            Some(Limit::Limited(8))
        );
        assert_eq!(usages.get("key_pairs").unwrap().available, None);
    }

    #[test]
    fn test_tally_accumulates() {
        let mut builder = QuotaUsages::builder();
        builder.add_quota("security_group_rule", Limit::Limited(100));
        builder.tally("security_group_rule", 4).tally("security_group_rule", 6);
        let usages = builder.build();

        let rules = usages.get("security_group_rule").unwrap();
        assert_eq!(rules.used, Some(10));
        assert_eq!(rules.available, Some(Limit::Limited(90)));
    }

    #[test]
    fn test_tally_without_quota_is_ignored() {
        let mut builder = QuotaUsages::builder();
        builder.tally("network", 3);
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_available_is_quota_minus_used() {
        let mut builder = QuotaUsages::builder();
        builder
            .add_limit_and_usage("cores", Limit::Limited(20), 2)
            .add_limit_and_usage("volumes", Limit::Limited(1), 4)
            .add_limit_and_usage("ram", Limit::Unlimited, 1024);
        let usages = builder.build();

        assert_eq!(usages.get("cores").unwrap().available, Some(Limit::Limited(18)));
        assert_eq!(usages.get("volumes").unwrap().available, Some(Limit::Limited(0)));
        assert_eq!(usages.get("ram").unwrap().available, Some(Limit::Unlimited));
    }

    #[test]
    fn test_retain_and_lookup() {
        let mut builder = QuotaUsages::builder();
        builder
            .add_limit_and_usage("ram", Limit::Limited(10000), 1024)
            .add_limit_and_usage("volumes", Limit::Limited(1), 4)
            .retain(|name| name == "volumes");
        let usages = builder.build();

        assert!(usages.contains("volumes"));
        assert!(usages.get("ram").is_none());
        assert_eq!(usages.exhausted().collect::<Vec<_>>(), vec!["volumes"]);
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let mut builder = QuotaUsages::builder();
        builder.add_limit_and_usage("ram", Limit::Unlimited, 1024);
        let json = serde_json::to_value(builder.build()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({"ram": {"quota": -1, "used": 1024, "available": -1}})
        );
    }
}
