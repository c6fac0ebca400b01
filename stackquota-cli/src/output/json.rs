//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use stackquota_core::{QuotaUsages, ResourceQuota};
use stackquota_fetch::ReportedError;
use std::collections::BTreeMap;

use super::ServiceStatus;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for the usages command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsagesOutput {
    pub tenant_id: String,
    pub resources: BTreeMap<String, ResourceOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<WarningOutput>,
}

/// One resource. Unlimited values are `null` with `unlimited` set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceOutput {
    pub quota: Option<u64>,
    pub unlimited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used_percent: Option<f64>,
}

/// A service that could not be queried.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WarningOutput {
    pub service: String,
    pub message: String,
}

/// JSON output for the services command.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicesOutput {
    pub project_id: String,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub token_expires_at: Option<DateTime<Utc>>,
    pub services: Vec<ServiceOutput>,
}

/// One backend service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOutput {
    pub service: String,
    pub project: String,
    pub enabled: bool,
    pub service_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats a tenant's quota usages along with any reported failures.
    pub fn format_usages(
        &self,
        tenant_id: &str,
        usages: &QuotaUsages,
        exhausted_only: bool,
        reports: &[ReportedError],
    ) -> Result<String> {
        let output = UsagesOutput {
            tenant_id: tenant_id.to_string(),
            resources: usages
                .iter()
                .filter(|(_, usage)| !exhausted_only || usage.is_exhausted())
                .map(|(name, usage)| (name.to_string(), resource_output(usage)))
                .collect(),
            warnings: reports
                .iter()
                .map(|report| WarningOutput {
                    service: report.service.to_string(),
                    message: report.message.clone(),
                })
                .collect(),
        };
        self.format(&output)
    }

    /// Formats service availability.
    pub fn format_services(
        &self,
        project_id: &str,
        statuses: &[ServiceStatus],
        token_expires_at: Option<DateTime<Utc>>,
    ) -> Result<String> {
        let output = ServicesOutput {
            project_id: project_id.to_string(),
            token_expires_at,
            services: statuses
                .iter()
                .map(|status| ServiceOutput {
                    service: status.descriptor.kind.to_string(),
                    project: status.descriptor.project_name.to_string(),
                    enabled: status.enabled,
                    service_types: status
                        .descriptor
                        .service_types
                        .iter()
                        .map(|t| (*t).to_string())
                        .collect(),
                    endpoint: status.endpoint.clone(),
                })
                .collect(),
        };
        self.format(&output)
    }
}

/// Converts a resource entry to its JSON shape.
pub fn resource_output(usage: &ResourceQuota) -> ResourceOutput {
    ResourceOutput {
        quota: usage.quota.finite(),
        unlimited: usage.is_unlimited(),
        used: usage.used,
        available: usage.available.and_then(|limit| limit.finite()),
        used_percent: usage.usage_percent().map(|p| (p * 10.0).round() / 10.0),
    }
}
