//! Limits command - raw absolute limits from compute and block storage.

use anyhow::Result;

use super::connect;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the limits command.
pub async fn run(cli: &Cli) -> Result<()> {
    let conn = connect(cli).await?;
    let limits = conn.aggregator.tenant_limit_usages(&conn.tenant_id).await?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            println!("{}", formatter.format_limits(&limits));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&limits)?);
        }
    }

    conn.finish(cli);
    Ok(())
}
