//! Quotas command - ceilings without usage.

use anyhow::Result;
use clap::Args;

use super::{connect, parse_targets};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the quotas command.
#[derive(Args, Default)]
pub struct QuotasArgs {
    /// Show the cloud-wide defaults instead of the tenant's quotas.
    #[arg(long)]
    pub defaults: bool,

    /// Resources to report, comma-separated.
    #[arg(long = "resource", short = 'r', value_delimiter = ',')]
    pub resources: Vec<String>,
}

/// Runs the quotas command.
pub async fn run(args: &QuotasArgs, cli: &Cli) -> Result<()> {
    let conn = connect(cli).await?;
    let targets = parse_targets(&args.resources);
    let target_refs: Option<Vec<&str>> = targets
        .as_ref()
        .map(|names| names.iter().map(String::as_str).collect());

    let quotas = if args.defaults {
        conn.aggregator
            .get_default_quota_data(&conn.tenant_id, target_refs.as_deref())
            .await?
    } else {
        conn.aggregator
            .get_tenant_quota_data(&conn.tenant_id, target_refs.as_deref())
            .await?
    };

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            let title = if args.defaults {
                "Default quotas".to_string()
            } else {
                format!("Quotas for tenant {}", conn.tenant_id)
            };
            println!("{}", formatter.format_quotas(&title, &quotas));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&quotas)?);
        }
    }

    conn.finish(cli);
    Ok(())
}
