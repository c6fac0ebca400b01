// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! StackQuota CLI - OpenStack project quota usage from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Quota usage for the scoped project
//! stackquota
//!
//! # Only a few resources
//! stackquota usages --resource instances,cores,ram
//!
//! # Another tenant
//! stackquota --tenant 5f0c1e... usages
//!
//! # Fields that do not apply to this cloud
//! stackquota disabled
//!
//! # JSON output
//! stackquota --format json --pretty
//!
//! # Default quota ceilings
//! stackquota quotas --defaults
//! ```

mod commands;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{config, disabled, limits, quotas, services, usages};

// ============================================================================
// CLI Definition
// ============================================================================

/// StackQuota CLI - OpenStack quota usage.
#[derive(Parser)]
#[command(name = "stackquota")]
#[command(about = "OpenStack project quota usage CLI")]
#[command(long_about = r#"
StackQuota reports quota, usage, and availability for an OpenStack project
across compute (Nova), block storage (Cinder), and networking (Neutron).

Credentials come from the config file and the usual OS_* environment
variables. The password is read from OS_PASSWORD or the system keychain.

Examples:
  stackquota                          # Usage for the scoped project
  stackquota usages -r cores,ram      # Selected resources
  stackquota disabled                 # Fields this cloud does not support
  stackquota limits                   # Raw absolute limits
  stackquota --format json            # JSON output
"#)]
#[command(version)]
#[command(author = "StackQuota Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'usages' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Tenant to report on. Defaults to the project the token is scoped to.
    #[arg(long, short, global = true)]
    pub tenant: Option<String>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show quota usage (default if no command specified).
    #[command(visible_alias = "u")]
    Usages(usages::UsagesArgs),

    /// List quota fields that do not apply to this cloud.
    #[command(visible_alias = "d")]
    Disabled,

    /// Show the raw absolute limits reported by compute and block storage.
    #[command(visible_alias = "l")]
    Limits,

    /// Show quota ceilings without usage.
    #[command(visible_alias = "q")]
    Quotas(quotas::QuotasArgs),

    /// Show which backend services are deployed.
    #[command(visible_alias = "s")]
    Services,

    /// Manage configuration and stored credentials.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    #[allow(dead_code)]
    Success = 0,
    /// General error.
    Error = 1,
    /// Configuration or credentials missing.
    ConfigMissing = 2,
    /// The identity service rejected the credentials.
    AuthFailed = 3,
    /// Some services could not be queried; output is partial.
    Partial = 4,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return;
    }

    let filter = if verbose {
        EnvFilter::new("stackquota=debug,info")
    } else {
        EnvFilter::new("stackquota=warn")
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Usages(args)) => usages::run(args, &cli).await,
        Some(Commands::Disabled) => disabled::run(&cli).await,
        Some(Commands::Limits) => limits::run(&cli).await,
        Some(Commands::Quotas(args)) => quotas::run(args, &cli).await,
        Some(Commands::Services) => services::run(&cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => usages::run(&usages::UsagesArgs::default(), &cli).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(commands::exit_code_for(&e) as i32);
    }

    Ok(())
}
