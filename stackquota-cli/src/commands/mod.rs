//! CLI command implementations.

pub mod config;
pub mod disabled;
pub mod limits;
pub mod quotas;
pub mod services;
pub mod usages;

use anyhow::{Context, Result};
use stackquota_core::all_quota_fields;
use stackquota_fetch::{CollectingReporter, FetchError, QuotaAggregator};
use stackquota_services::OpenStackCloud;
use stackquota_store::{Config, StoreError};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::{Cli, ExitCode};

/// An authenticated cloud plus an aggregator that collects failures.
pub struct Connection {
    pub cloud: OpenStackCloud,
    pub aggregator: QuotaAggregator,
    pub reporter: Arc<CollectingReporter>,
    pub tenant_id: String,
}

impl Connection {
    /// Prints collected failures to stderr and exits with
    /// [`ExitCode::Partial`] if there were any.
    pub fn finish(&self, cli: &Cli) {
        if self.reporter.is_empty() {
            return;
        }

        if !cli.quiet {
            for report in self.reporter.reports() {
                if cli.verbose {
                    eprintln!("Warning: {} ({})", report.message, report.detail);
                } else {
                    eprintln!("Warning: {}", report.message);
                }
            }
        }
        std::process::exit(ExitCode::Partial as i32);
    }
}

/// Loads the configuration, authenticates, and builds an aggregator.
pub async fn connect(cli: &Cli) -> Result<Connection> {
    let config = Config::load().await?;
    let credentials = config.credentials()?;
    let filter = config.endpoint_filter()?;
    let http = config.http_client()?;

    let cloud = OpenStackCloud::connect(http, &credentials, filter)
        .await
        .context("Failed to connect to the identity service")?
        .with_disabled_services(config.features.disabled_services.iter().copied());

    let reporter = Arc::new(CollectingReporter::new());
    let aggregator = cloud.aggregator(config.quota_settings(), reporter.clone());
    let tenant_id = cli
        .tenant
        .clone()
        .unwrap_or_else(|| cloud.project_id().to_string());

    debug!(tenant = %tenant_id, "Connected");

    Ok(Connection {
        cloud,
        aggregator,
        reporter,
        tenant_id,
    })
}

/// Normalizes `--resource` values. Names no service owns are kept (the
/// aggregator ignores them) but flagged.
pub fn parse_targets(resources: &[String]) -> Option<Vec<String>> {
    if resources.is_empty() {
        return None;
    }

    let known = all_quota_fields();
    let targets: Vec<String> = resources
        .iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();

    for name in &targets {
        if !known.contains(name.as_str()) {
            warn!(resource = %name, "Unknown quota resource");
        }
    }

    Some(targets)
}

/// Maps a command failure to a process exit code.
pub fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    if let Some(store) = error.downcast_ref::<StoreError>() {
        if store.is_user_error() {
            return ExitCode::ConfigMissing;
        }
    }
    if let Some(FetchError::AuthenticationFailed(_)) = error.downcast_ref::<FetchError>() {
        return ExitCode::AuthFailed;
    }
    ExitCode::Error
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_targets_empty_means_all() {
        assert!(parse_targets(&[]).is_none());
    }

    #[test]
    fn test_parse_targets_normalizes() {
        let targets = parse_targets(&[" Cores ".to_string(), "ram".to_string(), String::new()]);
        assert_eq!(targets, Some(vec!["cores".to_string(), "ram".to_string()]));
    }

    #[test]
    fn test_parse_targets_keeps_unknown() {
        let targets = parse_targets(&["bogus".to_string()]);
        assert_eq!(targets, Some(vec!["bogus".to_string()]));
    }

    #[test]
    fn test_exit_code_for_missing_setting() {
        let err = anyhow::Error::new(StoreError::MissingSetting {
            setting: "cloud.auth_url",
            env_var: "OS_AUTH_URL",
        });
        assert!(matches!(exit_code_for(&err), ExitCode::ConfigMissing));
    }

    #[test]
    fn test_exit_code_for_auth_failure() {
        let err = anyhow::Error::new(FetchError::AuthenticationFailed("denied".to_string()))
            .context("Failed to connect to the identity service");
        assert!(matches!(exit_code_for(&err), ExitCode::AuthFailed));
    }

    #[test]
    fn test_exit_code_for_other_errors() {
        let err = anyhow::anyhow!("boom");
        assert!(matches!(exit_code_for(&err), ExitCode::Error));
    }
}
