//! A service endpoint bound to an authenticated session.

use serde::de::DeserializeOwned;
use stackquota_core::{Limit, QuotaSet, ServiceKind};
use stackquota_fetch::Session;
use std::sync::Arc;
use tracing::debug;
use url::Url;

use crate::error::ServiceError;
use crate::registry::ServiceRegistry;

/// Where one service's requests go.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    session: Arc<Session>,
    kind: ServiceKind,
    url: Option<Url>,
}

impl ServiceEndpoint {
    /// Resolves `kind`'s endpoint from the session catalog.
    ///
    /// A missing endpoint is not an error here; requests fail with
    /// [`ServiceError::NoEndpoint`] instead.
    pub fn from_catalog(session: Arc<Session>, kind: ServiceKind) -> Self {
        let url = session.endpoint_for(ServiceRegistry::service_types(kind)).ok();
        debug!(service = %kind, endpoint = ?url.as_ref().map(Url::as_str), "Resolved endpoint");
        Self { session, kind, url }
    }

    /// Uses an explicit endpoint instead of the catalog.
    pub fn with_url(session: Arc<Session>, kind: ServiceKind, url: Url) -> Self {
        Self {
            session,
            kind,
            url: Some(url),
        }
    }

    /// The service this endpoint belongs to.
    pub fn kind(&self) -> ServiceKind {
        self.kind
    }

    /// The resolved base URL.
    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    /// GETs `path` below the endpoint.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ServiceError> {
        let url = self.url.as_ref().ok_or(ServiceError::NoEndpoint(self.kind))?;
        Ok(self.session.get_json(url, path, query).await?)
    }
}

/// Reads a `{"<wrapper>": {"name": n, ...}}` quota document.
///
/// Non-integer members (`id`, nested detail objects) are skipped.
pub(crate) fn quota_set_from(
    service: ServiceKind,
    body: &serde_json::Value,
    wrapper: &str,
) -> Result<QuotaSet, ServiceError> {
    let members = body
        .get(wrapper)
        .and_then(serde_json::Value::as_object)
        .ok_or_else(|| ServiceError::parse(service, format!("missing `{wrapper}` object")))?;

    Ok(members
        .iter()
        .filter_map(|(name, value)| value.as_i64().map(|raw| (name.as_str(), Limit::from_raw(raw))))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quota_set_skips_non_integers() {
        let body = json!({"quota_set": {"id": "t1", "cores": 20, "ram": -1}});
        let quotas = quota_set_from(ServiceKind::Compute, &body, "quota_set").unwrap();

        assert_eq!(quotas.len(), 2);
        assert_eq!(quotas.get("cores"), Some(Limit::Limited(20)));
        assert_eq!(quotas.get("ram"), Some(Limit::Unlimited));
    }

    #[test]
    fn test_quota_set_missing_wrapper() {
        let body = json!({"quota": {}});
        let result = quota_set_from(ServiceKind::Volume, &body, "quota_set");
        assert!(matches!(result, Err(ServiceError::Parse { .. })));
    }
}
