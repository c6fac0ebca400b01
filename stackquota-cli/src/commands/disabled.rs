//! Disabled command - quota fields that do not apply to this cloud.

use anyhow::Result;

use super::connect;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the disabled command.
pub async fn run(cli: &Cli) -> Result<()> {
    let conn = connect(cli).await?;
    let disabled = conn.aggregator.get_disabled_quotas(&conn.tenant_id).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_disabled(&disabled));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&disabled)?);
        }
    }

    Ok(())
}
