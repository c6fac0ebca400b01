//! One authenticated connection to an OpenStack cloud.
//!
//! [`OpenStackCloud`] bundles the session with a client per service and
//! hands them to a [`QuotaAggregator`].

use stackquota_core::{ErrorReporter, ServiceKind};
use stackquota_fetch::{
    Credentials, EndpointFilter, FetchError, HttpClient, QuotaAggregator, QuotaSettings, Session,
};
use std::sync::Arc;
use tracing::instrument;

use crate::catalog::SessionCatalog;
use crate::cinder::CinderClient;
use crate::neutron::NeutronClient;
use crate::nova::NovaClient;

/// Session plus service clients for one cloud and project.
#[derive(Debug, Clone)]
pub struct OpenStackCloud {
    session: Arc<Session>,
    catalog: Arc<SessionCatalog>,
    nova: Arc<NovaClient>,
    cinder: Arc<CinderClient>,
    neutron: Arc<NeutronClient>,
}

impl OpenStackCloud {
    /// Authenticates and builds the service clients.
    #[instrument(skip_all)]
    pub async fn connect(
        http: HttpClient,
        credentials: &Credentials,
        filter: EndpointFilter,
    ) -> Result<Self, FetchError> {
        let session = Session::authenticate(http, credentials, filter).await?;
        Ok(Self::from_session(Arc::new(session)))
    }

    /// Builds the service clients over an existing session.
    pub fn from_session(session: Arc<Session>) -> Self {
        Self {
            catalog: Arc::new(SessionCatalog::new(session.clone())),
            nova: Arc::new(NovaClient::new(session.clone())),
            cinder: Arc::new(CinderClient::new(session.clone())),
            neutron: Arc::new(NeutronClient::new(session.clone())),
            session,
        }
    }

    /// Treats `services` as not deployed regardless of the catalog.
    pub fn with_disabled_services(mut self, services: impl IntoIterator<Item = ServiceKind>) -> Self {
        let catalog = SessionCatalog::new(self.session.clone()).with_disabled(services);
        self.catalog = Arc::new(catalog);
        self
    }

    /// The authenticated session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Project the session is scoped to.
    pub fn project_id(&self) -> &str {
        self.session.project_id()
    }

    /// The network client, for extension listings.
    pub fn neutron(&self) -> &NeutronClient {
        &self.neutron
    }

    /// An aggregator over this cloud's services.
    pub fn aggregator(
        &self,
        settings: QuotaSettings,
        reporter: Arc<dyn ErrorReporter>,
    ) -> QuotaAggregator {
        QuotaAggregator::new(
            self.catalog.clone(),
            self.nova.clone(),
            self.cinder.clone(),
            self.neutron.clone(),
        )
        .with_settings(settings)
        .with_reporter(reporter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackquota_fetch::CollectingReporter;

    #[tokio::test]
    async fn test_aggregator_over_empty_catalog() {
        let body = r#"{"token": {"project": {"id": "p1"}, "catalog": []}}"#;
        let session = Session::from_token_body(
            HttpClient::new().unwrap(),
            "tok".to_string(),
            body,
            EndpointFilter::default(),
        )
        .unwrap();
        let cloud = OpenStackCloud::from_session(Arc::new(session));
        assert_eq!(cloud.project_id(), "p1");

        let reporter = Arc::new(CollectingReporter::new());
        let aggregator = cloud.aggregator(QuotaSettings::default(), reporter.clone());
        let usages = aggregator.get_tenant_quota_usages("p1", None).await.unwrap();

        assert!(usages.is_empty());
        assert!(reporter.is_empty());
        assert_eq!(aggregator.get_disabled_quotas("p1").await.unwrap().len(), 20);
    }
}
