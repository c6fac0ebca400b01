//! Identity (Keystone v3) session.
//!
//! A [`Session`] holds a project-scoped token together with the service
//! catalog returned alongside it. Service clients ask the session for their
//! endpoint and issue every request through [`Session::get_json`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, instrument};
use url::Url;

use crate::error::FetchError;
use crate::http::{HttpClient, SUBJECT_TOKEN_HEADER, join_endpoint};

// ============================================================================
// Credentials
// ============================================================================

/// Password credentials scoped to one project.
#[derive(Clone)]
pub struct Credentials {
    /// Identity endpoint, with or without the `/v3` suffix.
    pub auth_url: Url,
    /// User name.
    pub username: String,
    /// User password.
    pub password: String,
    /// Domain the user belongs to.
    pub user_domain_name: String,
    /// Project to scope the token to, by name.
    pub project_name: Option<String>,
    /// Project to scope the token to, by id. Takes precedence over the name.
    pub project_id: Option<String>,
    /// Domain the project belongs to.
    pub project_domain_name: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("auth_url", &self.auth_url.as_str())
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("user_domain_name", &self.user_domain_name)
            .field("project_name", &self.project_name)
            .field("project_id", &self.project_id)
            .field("project_domain_name", &self.project_domain_name)
            .finish()
    }
}

impl Credentials {
    fn auth_body(&self) -> serde_json::Value {
        let project = match &self.project_id {
            Some(id) => serde_json::json!({ "id": id }),
            None => serde_json::json!({
                "name": self.project_name.clone().unwrap_or_default(),
                "domain": { "name": self.project_domain_name },
            }),
        };

        serde_json::json!({
            "auth": {
                "identity": {
                    "methods": ["password"],
                    "password": {
                        "user": {
                            "name": self.username,
                            "domain": { "name": self.user_domain_name },
                            "password": self.password,
                        }
                    }
                },
                "scope": { "project": project }
            }
        })
    }
}

/// The token endpoint for an identity URL.
pub fn token_url(auth_url: &Url) -> Result<Url, FetchError> {
    let path = auth_url.path().trim_end_matches('/');
    if path.ends_with("/v3") {
        join_endpoint(auth_url, "auth/tokens")
    } else {
        join_endpoint(auth_url, "v3/auth/tokens")
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// Endpoint interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    /// Public endpoint.
    #[default]
    Public,
    /// Internal endpoint.
    Internal,
    /// Admin endpoint.
    Admin,
}

impl FromStr for Interface {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().trim_end_matches("url") {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "admin" => Ok(Self::Admin),
            other => Err(FetchError::InvalidResponse(format!(
                "unknown endpoint interface: {other}"
            ))),
        }
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        };
        f.write_str(s)
    }
}

/// One service in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Service type (`compute`, `volumev3`, `network`, ...).
    #[serde(rename = "type")]
    pub service_type: String,
    /// Service name (`nova`, `cinderv3`, ...).
    #[serde(default)]
    pub name: Option<String>,
    /// Published endpoints.
    #[serde(default)]
    pub endpoints: Vec<CatalogEndpoint>,
}

/// One endpoint of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEndpoint {
    /// Interface this endpoint serves.
    pub interface: Interface,
    /// Region id.
    #[serde(default, alias = "region_id")]
    pub region: Option<String>,
    /// Base URL.
    pub url: String,
}

/// Selects endpoints from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointFilter {
    /// Required interface.
    pub interface: Interface,
    /// Required region. `None` accepts any region.
    pub region: Option<String>,
}

impl EndpointFilter {
    fn matches(&self, endpoint: &CatalogEndpoint) -> bool {
        endpoint.interface == self.interface
            && self
                .region
                .as_deref()
                .is_none_or(|region| endpoint.region.as_deref() == Some(region))
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: TokenBody,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    project: Option<ProjectRef>,
    #[serde(default)]
    catalog: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
struct ProjectRef {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

// ============================================================================
// Session
// ============================================================================

/// An authenticated, project-scoped identity session.
#[derive(Debug, Clone)]
pub struct Session {
    http: HttpClient,
    token: String,
    project_id: String,
    project_name: Option<String>,
    expires_at: Option<DateTime<Utc>>,
    catalog: Vec<CatalogEntry>,
    filter: EndpointFilter,
}

impl Session {
    /// Authenticates with password credentials.
    #[instrument(skip(http, credentials, filter), fields(auth_url = %credentials.auth_url, user = %credentials.username))]
    pub async fn authenticate(
        http: HttpClient,
        credentials: &Credentials,
        filter: EndpointFilter,
    ) -> Result<Self, FetchError> {
        let url = token_url(&credentials.auth_url)?;
        debug!(url = %url, "Requesting project-scoped token");

        let response = http.post_json(&url, &credentials.auth_body()).await?;
        let token = response
            .headers()
            .get(SUBJECT_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                FetchError::InvalidResponse(format!("missing {SUBJECT_TOKEN_HEADER} header"))
            })?;
        let body = response.text().await?;

        let session = Self::from_token_body(http, token, &body, filter)?;
        info!(
            project = %session.project_id,
            services = session.catalog.len(),
            "Authenticated"
        );
        Ok(session)
    }

    /// Builds a session from an already-issued token and its JSON body.
    pub fn from_token_body(
        http: HttpClient,
        token: String,
        body: &str,
        filter: EndpointFilter,
    ) -> Result<Self, FetchError> {
        let parsed: TokenResponse = serde_json::from_str(body)?;
        let project = parsed.token.project.ok_or_else(|| {
            FetchError::AuthenticationFailed("token is not scoped to a project".to_string())
        })?;

        Ok(Self {
            http,
            token,
            project_id: project.id,
            project_name: project.name,
            expires_at: parsed.token.expires_at,
            catalog: parsed.token.catalog,
            filter,
        })
    }

    /// The token value.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Id of the project the token is scoped to.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Name of the project the token is scoped to, when reported.
    pub fn project_name(&self) -> Option<&str> {
        self.project_name.as_deref()
    }

    /// When the token stops being valid.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Returns true if the token has expired.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at <= Utc::now())
    }

    /// The service catalog.
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    /// Endpoint for the first of `service_types` that has one matching the
    /// session's interface and region.
    pub fn endpoint_for(&self, service_types: &[&str]) -> Result<Url, FetchError> {
        for service_type in service_types {
            let endpoint = self
                .catalog
                .iter()
                .filter(|entry| entry.service_type == *service_type)
                .flat_map(|entry| entry.endpoints.iter())
                .find(|endpoint| self.filter.matches(endpoint));

            if let Some(endpoint) = endpoint {
                return Ok(Url::parse(&endpoint.url)?);
            }
        }

        Err(FetchError::EndpointNotFound(service_types.join("/")))
    }

    /// Returns true if any of `service_types` has a matching endpoint.
    ///
    /// A missing endpoint is `Ok(false)`. A matching endpoint whose URL does
    /// not parse is an error.
    pub fn has_service(&self, service_types: &[&str]) -> Result<bool, FetchError> {
        match self.endpoint_for(service_types) {
            Ok(_) => Ok(true),
            Err(FetchError::EndpointNotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// GETs `path` below `endpoint` and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &Url,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        if self.is_expired() {
            return Err(FetchError::AuthenticationFailed(
                "token has expired".to_string(),
            ));
        }

        let mut url = join_endpoint(endpoint, path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        self.http.get_json(&url, &self.token).await
    }
}
