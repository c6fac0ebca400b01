//! Integration tests for core quota types.

use stackquota_core::{Limit, QuotaUsages, ServiceKind, all_quota_fields};

#[test]
fn test_usages_serialization_roundtrip() {
    let mut builder = QuotaUsages::builder();
    builder
        .add_limit_and_usage("instances", Limit::Limited(10), 2)
        .add_limit_and_usage("ram", Limit::Unlimited, 1024)
        .add_quota("key_pairs", Limit::Limited(100));
    let usages = builder.build();

    let json = serde_json::to_string(&usages).unwrap();
    let parsed: QuotaUsages = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, usages);
    assert!(parsed.get("ram").unwrap().is_unlimited());
}

#[test]
fn test_every_field_has_one_owner() {
    for field in all_quota_fields() {
        let owners = ServiceKind::all()
            .iter()
            .filter(|service| service.owns(field))
            .count();
        assert_eq!(owners, 1, "{field} should have exactly one owner");
    }
}
