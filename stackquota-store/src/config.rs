//! Configuration management.
//!
//! Settings come from `config.json` in the config directory, overlaid by the
//! standard `OS_*` environment variables used by every OpenStack client.

use serde::{Deserialize, Serialize};
use stackquota_core::ServiceKind;
use stackquota_fetch::{
    Credentials, EndpointFilter, HttpClient, Interface, QuotaSettings, RetryStrategy,
};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use crate::credentials::{PASSWORD_ENV, account_name, resolve_password};
use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

// ============================================================================
// Config Types
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Cloud account settings.
    #[serde(default)]
    pub cloud: CloudConfig,
    /// Which quotas apply to this deployment.
    #[serde(default)]
    pub features: FeaturesConfig,
    /// HTTP transport settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Cloud account settings. The password is never stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Identity endpoint.
    #[serde(default)]
    pub auth_url: Option<String>,
    /// User name.
    #[serde(default)]
    pub username: Option<String>,
    /// User domain.
    #[serde(default = "default_domain")]
    pub user_domain_name: String,
    /// Project name.
    #[serde(default)]
    pub project_name: Option<String>,
    /// Project id.
    #[serde(default)]
    pub project_id: Option<String>,
    /// Project domain.
    #[serde(default = "default_domain")]
    pub project_domain_name: String,
    /// Region to pick endpoints from.
    #[serde(default)]
    pub region_name: Option<String>,
    /// Endpoint interface.
    #[serde(default = "default_interface")]
    pub interface: String,
    /// Environment variable holding the password.
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

/// Deployment feature switches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturesConfig {
    /// Quota switches handed to the aggregator.
    #[serde(flatten)]
    pub quotas: QuotaSettings,
    /// Services to treat as not deployed even if the catalog lists them.
    #[serde(default)]
    pub disabled_services: Vec<ServiceKind>,
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempts per request, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,
}

fn default_domain() -> String {
    "Default".to_string()
}

fn default_interface() -> String {
    "public".to_string()
}

fn default_password_env() -> String {
    PASSWORD_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            auth_url: None,
            username: None,
            user_domain_name: default_domain(),
            project_name: None,
            project_id: None,
            project_domain_name: default_domain(),
            region_name: None,
            interface: default_interface(),
            password_env: default_password_env(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            insecure: false,
        }
    }
}

// ============================================================================
// Loading and Saving
// ============================================================================

impl Config {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path, then applies the
    /// environment.
    pub async fn load() -> Result<Self, StoreError> {
        let mut config = Self::load_from(&Self::default_path()).await?;
        config.apply_env();
        Ok(config)
    }

    /// Loads configuration from a specific path. A missing file yields the
    /// defaults.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !tokio::fs::try_exists(path).await? {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let config = load_json(path).await?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Saves configuration to the default path.
    pub async fn save(&self) -> Result<(), StoreError> {
        self.save_to(&Self::default_path()).await
    }

    /// Saves configuration to a specific path.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    // ========================================================================
    // Environment
    // ========================================================================

    /// Overlays the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlays values from `lookup`, which maps `OS_*` names to values.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |keys: &[&str]| keys.iter().find_map(|key| lookup(key).filter(|v| !v.is_empty()));
        let cloud = &mut self.cloud;

        if let Some(v) = get(&["OS_AUTH_URL"]) {
            cloud.auth_url = Some(v);
        }
        if let Some(v) = get(&["OS_USERNAME"]) {
            cloud.username = Some(v);
        }
        if let Some(v) = get(&["OS_USER_DOMAIN_NAME"]) {
            cloud.user_domain_name = v;
        }
        if let Some(v) = get(&["OS_PROJECT_NAME", "OS_TENANT_NAME"]) {
            cloud.project_name = Some(v);
        }
        if let Some(v) = get(&["OS_PROJECT_ID", "OS_TENANT_ID"]) {
            cloud.project_id = Some(v);
        }
        if let Some(v) = get(&["OS_PROJECT_DOMAIN_NAME"]) {
            cloud.project_domain_name = v;
        }
        if let Some(v) = get(&["OS_REGION_NAME"]) {
            cloud.region_name = Some(v);
        }
        if let Some(v) = get(&["OS_INTERFACE", "OS_ENDPOINT_TYPE"]) {
            cloud.interface = v;
        }
    }

    // ========================================================================
    // Derived Settings
    // ========================================================================

    /// Parsed identity endpoint.
    pub fn auth_url(&self) -> Result<Url, StoreError> {
        let raw = self.cloud.auth_url.as_deref().ok_or(StoreError::MissingSetting {
            setting: "cloud.auth_url",
            env_var: "OS_AUTH_URL",
        })?;
        Url::parse(raw).map_err(|e| StoreError::Config(format!("invalid auth_url {raw}: {e}")))
    }

    /// Keychain account for the configured user.
    pub fn keychain_account(&self) -> Result<String, StoreError> {
        Ok(account_name(self.username()?, &self.auth_url()?))
    }

    fn username(&self) -> Result<&str, StoreError> {
        self.cloud.username.as_deref().ok_or(StoreError::MissingSetting {
            setting: "cloud.username",
            env_var: "OS_USERNAME",
        })
    }

    /// Credentials for the configured account, with the password taken from
    /// the password variable (`OS_PASSWORD` by default) or the keychain.
    pub fn credentials(&self) -> Result<Credentials, StoreError> {
        let password = resolve_password(
            &self.keychain_account()?,
            std::env::var(&self.cloud.password_env).ok(),
        )?;
        self.credentials_with_password(password)
    }

    /// Credentials for the configured account with an explicit password.
    pub fn credentials_with_password(&self, password: String) -> Result<Credentials, StoreError> {
        let cloud = &self.cloud;
        if cloud.project_name.is_none() && cloud.project_id.is_none() {
            return Err(StoreError::MissingSetting {
                setting: "cloud.project_name",
                env_var: "OS_PROJECT_NAME",
            });
        }

        Ok(Credentials {
            auth_url: self.auth_url()?,
            username: self.username()?.to_string(),
            password,
            user_domain_name: cloud.user_domain_name.clone(),
            project_name: cloud.project_name.clone(),
            project_id: cloud.project_id.clone(),
            project_domain_name: cloud.project_domain_name.clone(),
        })
    }

    /// Endpoint selection from interface and region.
    pub fn endpoint_filter(&self) -> Result<EndpointFilter, StoreError> {
        let interface: Interface = self
            .cloud
            .interface
            .parse()
            .map_err(|_| StoreError::Config(format!("unknown interface {}", self.cloud.interface)))?;

        Ok(EndpointFilter {
            interface,
            region: self.cloud.region_name.clone(),
        })
    }

    /// An HTTP client built from the transport settings.
    pub fn http_client(&self) -> Result<HttpClient, StoreError> {
        let client = HttpClient::configured(
            Duration::from_secs(self.http.timeout_secs),
            self.http.insecure,
        )?
        .with_retry_strategy(RetryStrategy::new(self.http.max_attempts));
        Ok(client)
    }

    /// Quota switches for the aggregator.
    pub fn quota_settings(&self) -> QuotaSettings {
        self.features.quotas.clone()
    }
}

// ============================================================================
// Tests
// ============================================================================
