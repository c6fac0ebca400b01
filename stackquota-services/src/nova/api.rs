//! Nova API client.

use async_trait::async_trait;
use stackquota_core::{AbsoluteLimits, ComputeApi, CoreError, QuotaSet, ServiceKind};
use stackquota_fetch::Session;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::parser::{parse_limits, parse_quota_set};
use crate::endpoint::ServiceEndpoint;

/// Client for the compute API.
#[derive(Debug, Clone)]
pub struct NovaClient {
    endpoint: ServiceEndpoint,
}

impl NovaClient {
    /// Creates a client using the session's catalog.
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            endpoint: ServiceEndpoint::from_catalog(session, ServiceKind::Compute),
        }
    }

    /// Creates a client against an explicit endpoint.
    pub fn with_endpoint(endpoint: ServiceEndpoint) -> Self {
        Self { endpoint }
    }
}

#[async_trait]
impl ComputeApi for NovaClient {
    #[instrument(skip(self))]
    async fn tenant_absolute_limits(&self, tenant_id: &str) -> Result<AbsoluteLimits, CoreError> {
        let body = self
            .endpoint
            .get("limits", &[("reserved", "1"), ("tenant_id", tenant_id)])
            .await?;
        let limits = parse_limits(body)?;
        debug!(entries = limits.len(), "Compute limits fetched");
        Ok(limits)
    }

    #[instrument(skip(self))]
    async fn tenant_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError> {
        let body = self
            .endpoint
            .get(&format!("os-quota-sets/{tenant_id}"), &[])
            .await?;
        Ok(parse_quota_set(&body)?)
    }

    #[instrument(skip(self))]
    async fn default_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError> {
        let body = self
            .endpoint
            .get(&format!("os-quota-sets/{tenant_id}/defaults"), &[])
            .await?;
        Ok(parse_quota_set(&body)?)
    }
}
