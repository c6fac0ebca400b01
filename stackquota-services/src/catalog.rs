//! Service availability backed by the identity catalog.

use async_trait::async_trait;
use stackquota_core::{CoreError, ServiceCatalog, ServiceKind};
use stackquota_fetch::Session;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::registry::ServiceRegistry;

/// A service is enabled when the catalog publishes an endpoint for it and
/// the operator has not switched it off.
#[derive(Debug, Clone)]
pub struct SessionCatalog {
    session: Arc<Session>,
    disabled: BTreeSet<ServiceKind>,
}

impl SessionCatalog {
    /// Creates a catalog view over `session`.
    pub fn new(session: Arc<Session>) -> Self {
        Self {
            session,
            disabled: BTreeSet::new(),
        }
    }

    /// Treats `services` as not deployed regardless of the catalog.
    pub fn with_disabled(mut self, services: impl IntoIterator<Item = ServiceKind>) -> Self {
        self.disabled.extend(services);
        self
    }
}

#[async_trait]
impl ServiceCatalog for SessionCatalog {
    async fn is_service_enabled(&self, service: ServiceKind) -> Result<bool, CoreError> {
        if self.disabled.contains(&service) {
            debug!(service = %service, "Service disabled by configuration");
            return Ok(false);
        }

        let enabled = self
            .session
            .has_service(ServiceRegistry::service_types(service))?;
        debug!(service = %service, enabled, "Checked service catalog");
        Ok(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackquota_fetch::{EndpointFilter, HttpClient};

    fn session() -> Arc<Session> {
        session_from(
            r#"{
            "token": {
                "project": {"id": "p1"},
                "catalog": [
                    {"type": "compute", "endpoints": [{"interface": "public", "url": "https://nova/v2.1"}]},
                    {"type": "block-storage", "endpoints": [{"interface": "public", "url": "https://cinder/v3/p1"}]},
                    {"type": "network", "endpoints": [{"interface": "admin", "url": "https://neutron"}]}
                ]
            }
        }"#,
        )
    }

    fn session_from(body: &str) -> Arc<Session> {
        let session = Session::from_token_body(
            HttpClient::new().unwrap(),
            "tok".to_string(),
            body,
            EndpointFilter::default(),
        )
        .unwrap();
        Arc::new(session)
    }

    #[tokio::test]
    async fn test_enabled_from_catalog() {
        let catalog = SessionCatalog::new(session());

        assert!(catalog.is_service_enabled(ServiceKind::Compute).await.unwrap());
        assert!(catalog.is_service_enabled(ServiceKind::Volume).await.unwrap());
        // Only an admin endpoint, and the session asks for public.
        assert!(!catalog.is_service_enabled(ServiceKind::Network).await.unwrap());
    }

    #[tokio::test]
    async fn test_disabled_by_configuration() {
        let catalog = SessionCatalog::new(session()).with_disabled([ServiceKind::Volume]);
        assert!(!catalog.is_service_enabled(ServiceKind::Volume).await.unwrap());
        assert!(catalog.is_service_enabled(ServiceKind::Compute).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_an_error() {
        let catalog = SessionCatalog::new(session_from(
            r#"{
            "token": {
                "project": {"id": "p1"},
                "catalog": [
                    {"type": "compute", "endpoints": [{"interface": "public", "url": "not a url"}]}
                ]
            }
        }"#,
        ));

        let result = catalog.is_service_enabled(ServiceKind::Compute).await;
        assert!(matches!(result, Err(CoreError::InvalidConfig(_))));
        assert!(!catalog.is_service_enabled(ServiceKind::Volume).await.unwrap());
    }
}
