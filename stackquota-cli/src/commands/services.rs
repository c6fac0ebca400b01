//! Services command - which backend services this cloud deploys.

use anyhow::Result;
use chrono::Utc;
use stackquota_services::ServiceRegistry;

use super::connect;
use crate::output::{JsonFormatter, ServiceStatus, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the services command.
pub async fn run(cli: &Cli) -> Result<()> {
    let conn = connect(cli).await?;
    let availability = conn.aggregator.service_availability().await?;

    let statuses: Vec<ServiceStatus> = ServiceRegistry::all()
        .iter()
        .map(|desc| ServiceStatus {
            descriptor: desc,
            enabled: availability.is_enabled(desc.kind),
            endpoint: conn
                .cloud
                .session()
                .endpoint_for(desc.service_types)
                .ok()
                .map(|url| url.to_string()),
        })
        .collect();

    let session = conn.cloud.session();
    let expires_in = session.expires_at().map(|at| at - Utc::now());

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!(
                "{}",
                formatter.format_services(
                    session.project_name().unwrap_or(session.project_id()),
                    &statuses,
                    expires_in,
                )
            );
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_services(
                    session.project_id(),
                    &statuses,
                    session.expires_at()
                )?
            );
        }
    }

    Ok(())
}
