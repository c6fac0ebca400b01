//! Usages command - quota, usage, and availability per resource.

use anyhow::Result;
use clap::Args;
use tracing::info;

use super::{connect, parse_targets};
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the usages command.
#[derive(Args, Default)]
pub struct UsagesArgs {
    /// Resources to report, comma-separated (e.g. "instances,cores,ram").
    /// Reports every enabled resource when omitted.
    #[arg(long = "resource", short = 'r', value_delimiter = ',')]
    pub resources: Vec<String>,

    /// Only show resources with nothing left to allocate.
    #[arg(long)]
    pub exhausted: bool,
}

/// Runs the usages command.
pub async fn run(args: &UsagesArgs, cli: &Cli) -> Result<()> {
    let conn = connect(cli).await?;
    let targets = parse_targets(&args.resources);
    let target_refs: Option<Vec<&str>> = targets
        .as_ref()
        .map(|names| names.iter().map(String::as_str).collect());

    info!(tenant = %conn.tenant_id, "Fetching quota usages");

    let usages = conn
        .aggregator
        .get_tenant_quota_usages(&conn.tenant_id, target_refs.as_deref())
        .await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_usages(&conn.tenant_id, &usages, args.exhausted));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!(
                "{}",
                formatter.format_usages(
                    &conn.tenant_id,
                    &usages,
                    args.exhausted,
                    &conn.reporter.reports()
                )?
            );
        }
    }

    conn.finish(cli);
    Ok(())
}
