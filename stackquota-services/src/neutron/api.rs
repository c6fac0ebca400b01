//! Neutron API client.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use stackquota_core::{
    CoreError, NetworkApi, NetworkResource, QuotaDetail, QuotaSet, SecurityGroup, ServiceKind,
};
use stackquota_fetch::Session;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

use super::parser::{parse_extensions, parse_list, parse_quota_details, parse_quota_set};
use crate::endpoint::ServiceEndpoint;
use crate::error::ServiceError;

/// API version prefix prepended to every path.
const API_PREFIX: &str = "v2.0";

/// Client for the network API.
///
/// The extension list is fetched on first use and kept for the lifetime of
/// the client. A failed fetch is not cached.
#[derive(Debug)]
pub struct NeutronClient {
    endpoint: ServiceEndpoint,
    prefix: &'static str,
    extensions: OnceCell<BTreeSet<String>>,
}

impl NeutronClient {
    /// Creates a client using the session's catalog.
    pub fn new(session: Arc<Session>) -> Self {
        Self::with_endpoint(ServiceEndpoint::from_catalog(session, ServiceKind::Network))
    }

    /// Creates a client against an explicit endpoint.
    pub fn with_endpoint(endpoint: ServiceEndpoint) -> Self {
        // Some catalogs publish the endpoint with the version already on it.
        let versioned = endpoint
            .url()
            .is_some_and(|url| url.path().trim_end_matches('/').ends_with(API_PREFIX));

        Self {
            endpoint,
            prefix: if versioned { "" } else { API_PREFIX },
            extensions: OnceCell::new(),
        }
    }

    fn path(&self, path: &str) -> String {
        if self.prefix.is_empty() {
            path.to_string()
        } else {
            format!("{}/{path}", self.prefix)
        }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<serde_json::Value, ServiceError> {
        self.endpoint.get(&self.path(path), query).await
    }

    /// Extension aliases loaded in this deployment.
    pub async fn extensions(&self) -> Result<&BTreeSet<String>, CoreError> {
        let extensions = self
            .extensions
            .get_or_try_init(|| async {
                let body = self.get("extensions", &[]).await?;
                let aliases = parse_extensions(body)?;
                debug!(count = aliases.len(), "Network extensions loaded");
                Ok::<_, ServiceError>(aliases)
            })
            .await?;
        Ok(extensions)
    }

    async fn list<T: DeserializeOwned>(
        &self,
        resource: &str,
        collection: &str,
        tenant_id: &str,
    ) -> Result<Vec<T>, CoreError> {
        let body = self.get(resource, &[("tenant_id", tenant_id)]).await?;
        let items: Vec<T> = parse_list(&body, collection)?;
        debug!(resource, count = items.len(), "Listed network resources");
        Ok(items)
    }
}

#[async_trait]
impl NetworkApi for NeutronClient {
    async fn is_extension_supported(&self, alias: &str) -> Result<bool, CoreError> {
        Ok(self.extensions().await?.contains(alias))
    }

    #[instrument(skip(self))]
    async fn tenant_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError> {
        let body = self.get(&format!("quotas/{tenant_id}"), &[]).await?;
        Ok(parse_quota_set(&body)?)
    }

    #[instrument(skip(self))]
    async fn default_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError> {
        let body = self.get(&format!("quotas/{tenant_id}/default"), &[]).await?;
        Ok(parse_quota_set(&body)?)
    }

    #[instrument(skip(self))]
    async fn tenant_quota_detail_get(
        &self,
        tenant_id: &str,
    ) -> Result<BTreeMap<String, QuotaDetail>, CoreError> {
        let body = self.get(&format!("quotas/{tenant_id}/details"), &[]).await?;
        Ok(parse_quota_details(body)?)
    }

    async fn network_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError> {
        self.list("networks", "networks", tenant_id).await
    }

    async fn subnet_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError> {
        self.list("subnets", "subnets", tenant_id).await
    }

    async fn port_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError> {
        self.list("ports", "ports", tenant_id).await
    }

    async fn router_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError> {
        self.list("routers", "routers", tenant_id).await
    }

    async fn floating_ip_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError> {
        self.list("floatingips", "floatingips", tenant_id).await
    }

    async fn security_group_list(&self, tenant_id: &str) -> Result<Vec<SecurityGroup>, CoreError> {
        self.list("security-groups", "security_groups", tenant_id)
            .await
    }
}
