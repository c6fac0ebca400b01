//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

fn sample_usages() -> stackquota_core::QuotaUsages {
    use stackquota_core::{Limit, QuotaUsages};

    let mut builder = QuotaUsages::builder();
    builder
        .add_limit_and_usage("cores", Limit::Limited(20), 4)
        .add_limit_and_usage("ram", Limit::Unlimited, 2048)
        .add_limit_and_usage("floatingip", Limit::Limited(2), 2)
        .add_quota("key_pairs", Limit::Limited(100));
    builder.build()
}

#[cfg(test)]
mod text_formatter_tests {
    use super::super::text::TextFormatter;
    use super::sample_usages;
    use stackquota_core::{AbsoluteLimits, Limit, QuotaSet};
    use std::collections::BTreeSet;

    #[test]
    fn test_usages_lists_every_resource() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_usages("t1", &sample_usages(), false);

        assert!(output.starts_with("Quota usage for tenant t1"));
        assert!(output.contains("cores"));
        assert!(output.contains("4 / 20"));
        assert!(output.contains("16 left"));
        assert!(output.contains("2048 / unlimited"));
        assert!(output.contains("quota 100"));
    }

    #[test]
    fn test_usages_exhausted_only() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_usages("t1", &sample_usages(), true);

        assert!(output.contains("floatingip"));
        assert!(output.contains("0 left"));
        assert!(!output.contains("cores"));
        assert!(!output.contains("key_pairs"));
    }

    #[test]
    fn test_usages_empty() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_usages("t1", &stackquota_core::QuotaUsages::default(), false);
        assert!(output.contains("No quota information available."));
    }

    #[test]
    fn test_unlimited_resource_has_no_headroom() {
        let formatter = TextFormatter::new(false);
        let usages = sample_usages();
        let ram = usages.get("ram").unwrap();
        let line = formatter.format_resource("ram", ram);
        assert!(!line.contains("left"));
    }

    #[test]
    fn test_disabled_fields() {
        let formatter = TextFormatter::new(false);
        let disabled: BTreeSet<String> = ["router", "floatingip"].iter().map(|s| (*s).to_string()).collect();
        let output = formatter.format_disabled(&disabled);

        assert!(output.contains("Disabled quota fields (2)"));
        assert!(output.contains("• floatingip"));
        assert!(output.contains("• router"));
    }

    #[test]
    fn test_no_disabled_fields() {
        let formatter = TextFormatter::new(false);
        assert_eq!(
            formatter.format_disabled(&BTreeSet::new()),
            "All quota fields are enabled."
        );
    }

    #[test]
    fn test_limits_show_unlimited_ceilings() {
        let formatter = TextFormatter::new(false);
        let mut limits = AbsoluteLimits::new();
        limits.insert("maxTotalRAMSize", -1);
        limits.insert("totalRAMUsed", 512);
        let output = formatter.format_limits(&limits);

        assert!(output.contains("unlimited"));
        assert!(output.contains("512"));
    }

    #[test]
    fn test_quotas() {
        let formatter = TextFormatter::new(false);
        let mut quotas = QuotaSet::new();
        quotas.insert("volumes", Limit::Limited(10));
        quotas.insert("gigabytes", Limit::Unlimited);
        let output = formatter.format_quotas("Default quotas", &quotas);

        assert!(output.starts_with("Default quotas"));
        assert!(output.contains("volumes"));
        assert!(output.contains("10"));
        assert!(output.contains("unlimited"));
    }

    #[test]
    fn test_no_colors_when_disabled() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_usages("t1", &sample_usages(), false);
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_colors_when_enabled() {
        let formatter = TextFormatter::new(true);
        let output = formatter.format_usages("t1", &sample_usages(), false);
        assert!(output.contains("\x1b[1m"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::ServiceStatus;
    use super::super::json::JsonFormatter;
    use super::sample_usages;
    use stackquota_core::ServiceKind;
    use stackquota_fetch::{NETWORK_QUOTAS_MESSAGE, ReportedError};
    use stackquota_services::ServiceRegistry;

    #[test]
    fn test_usages_shape() {
        let formatter = JsonFormatter::new(false);
        let json = formatter.format_usages("t1", &sample_usages(), false, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["tenantId"], "t1");
        assert_eq!(value["resources"]["cores"]["quota"], 20);
        assert_eq!(value["resources"]["cores"]["used"], 4);
        assert_eq!(value["resources"]["cores"]["available"], 16);
        assert_eq!(value["resources"]["ram"]["unlimited"], true);
        assert!(value["resources"]["ram"]["quota"].is_null());
        assert!(value["resources"]["key_pairs"].get("used").is_none());
        assert!(value.get("warnings").is_none());
    }

    #[test]
    fn test_usages_include_warnings() {
        let formatter = JsonFormatter::new(false);
        let reports = vec![ReportedError {
            service: ServiceKind::Network,
            tenant_id: "t1".to_string(),
            message: NETWORK_QUOTAS_MESSAGE.to_string(),
            detail: "connection refused".to_string(),
        }];
        let json = formatter.format_usages("t1", &sample_usages(), false, &reports).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["warnings"][0]["service"], "network");
        assert_eq!(value["warnings"][0]["message"], NETWORK_QUOTAS_MESSAGE);
    }

    #[test]
    fn test_services_shape() {
        let formatter = JsonFormatter::new(false);
        let statuses = vec![
            ServiceStatus {
                descriptor: ServiceRegistry::get(ServiceKind::Compute),
                enabled: true,
                endpoint: Some("https://nova.example.com/v2.1".to_string()),
            },
            ServiceStatus {
                descriptor: ServiceRegistry::get(ServiceKind::Volume),
                enabled: false,
                endpoint: None,
            },
        ];
        let json = formatter.format_services("p1", &statuses, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["projectId"], "p1");
        assert!(value.get("tokenExpiresAt").is_none());
        assert_eq!(value["services"][0]["service"], "compute");
        assert_eq!(value["services"][0]["enabled"], true);
        assert_eq!(value["services"][1]["project"], "Cinder");
        assert_eq!(value["services"][1]["serviceTypes"][0], "volumev3");
        assert!(value["services"][1].get("endpoint").is_none());
    }
}
