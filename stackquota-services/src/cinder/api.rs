//! Cinder API client.

use async_trait::async_trait;
use stackquota_core::{AbsoluteLimits, CoreError, QuotaSet, ServiceKind, VolumeApi};
use stackquota_fetch::Session;
use std::sync::Arc;
use tracing::{debug, instrument};

use super::parser::{parse_limits, parse_quota_set};
use crate::endpoint::ServiceEndpoint;

/// Client for the block-storage API.
#[derive(Debug, Clone)]
pub struct CinderClient {
    endpoint: ServiceEndpoint,
}

impl CinderClient {
    /// Creates a client using the session's catalog.
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            endpoint: ServiceEndpoint::from_catalog(session, ServiceKind::Volume),
        }
    }

    /// Creates a client against an explicit endpoint.
    pub fn with_endpoint(endpoint: ServiceEndpoint) -> Self {
        Self { endpoint }
    }

    async fn quota_set(&self, path: &str) -> Result<QuotaSet, CoreError> {
        let body = self.endpoint.get(path, &[]).await?;
        Ok(parse_quota_set(&body)?)
    }
}

#[async_trait]
impl VolumeApi for CinderClient {
    #[instrument(skip(self))]
    async fn tenant_absolute_limits(&self, tenant_id: &str) -> Result<AbsoluteLimits, CoreError> {
        let body = self
            .endpoint
            .get("limits", &[("project_id", tenant_id)])
            .await?;
        let limits = parse_limits(&body)?;
        debug!(entries = limits.len(), "Volume limits fetched");
        Ok(limits)
    }

    #[instrument(skip(self))]
    async fn tenant_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError> {
        self.quota_set(&format!("os-quota-sets/{tenant_id}")).await
    }

    #[instrument(skip(self))]
    async fn default_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError> {
        self.quota_set(&format!("os-quota-sets/{tenant_id}/defaults"))
            .await
    }
}
