//! Config command - manage configuration and the stored password.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use stackquota_store::{
    Config, default_config_dir, default_config_path, delete_password, get_password,
    store_password,
};
use std::io::BufRead;
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration (file plus environment).
    Show,

    /// Show configuration paths.
    Path,

    /// Write a configuration file from the current environment.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Store the password in the system keychain.
    SetPassword {
        /// Password. Read from stdin when omitted.
        password: Option<String>,
    },

    /// Remove the password from the system keychain.
    DeletePassword,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Init { force } => init_config(*force, cli).await,
        ConfigAction::SetPassword { password } => set_password(password.clone(), cli).await,
        ConfigAction::DeletePassword => remove_password(cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let config = Config::load().await?;

    match cli.format {
        OutputFormat::Text => {
            let cloud = &config.cloud;
            let features = &config.features;
            let unset = || "(not set)".to_string();

            println!("StackQuota Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Cloud:");
            println!("  Auth URL:        {}", cloud.auth_url.clone().unwrap_or_else(unset));
            println!("  Username:        {}", cloud.username.clone().unwrap_or_else(unset));
            println!("  User domain:     {}", cloud.user_domain_name);
            println!("  Project:         {}", cloud.project_name.clone().unwrap_or_else(unset));
            println!("  Project id:      {}", cloud.project_id.clone().unwrap_or_else(unset));
            println!("  Project domain:  {}", cloud.project_domain_name);
            println!("  Region:          {}", cloud.region_name.clone().unwrap_or_else(unset));
            println!("  Interface:       {}", cloud.interface);
            println!("  Password:        {}", password_status(&config));
            println!();
            println!("Features:");
            println!("  Nova quotas:     {}", features.quotas.nova_quotas_enabled);
            println!("  Neutron quotas:  {}", features.quotas.neutron.enable_quotas);
            println!("  Routers:         {}", features.quotas.neutron.enable_router);
            println!("  Floating IPs:    {}", features.quotas.neutron.enable_floating_ip);
            if !features.disabled_services.is_empty() {
                let names: Vec<&str> = features.disabled_services.iter().map(|s| s.as_str()).collect();
                println!("  Disabled:        {}", names.join(", "));
            }
            println!();
            println!("HTTP:");
            println!("  Timeout:         {}s", config.http.timeout_secs);
            println!("  Max attempts:    {}", config.http.max_attempts);
            println!("  Insecure TLS:    {}", config.http.insecure);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&config)?);
        }
    }

    Ok(())
}

fn password_status(config: &Config) -> String {
    let env_var = &config.cloud.password_env;
    if std::env::var(env_var).is_ok_and(|p| !p.is_empty()) {
        return format!("from {env_var}");
    }
    let Ok(account) = config.keychain_account() else {
        return "(not set)".to_string();
    };
    match get_password(&account) {
        Ok(Some(_)) => format!("in keychain ({account})"),
        Ok(None) => "(not set)".to_string(),
        Err(e) => format!("keychain unavailable: {e}"),
    }
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_path = default_config_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Config directory: {}", config_dir.display());
            println!("Config file:      {}", config_path.display());
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            let paths = serde_json::json!({
                "config_dir": config_dir,
                "config_file": config_path,
            });
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = default_config_path();
    if !force && tokio::fs::try_exists(&path).await? {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let mut config = Config::default();
    config.apply_env();
    config.save_to(&path).await?;

    if !cli.quiet {
        println!("Wrote {}", path.display());
    }
    Ok(())
}

async fn set_password(password: Option<String>, cli: &Cli) -> Result<()> {
    let config = Config::load().await?;
    let account = config.keychain_account()?;

    let password = match password {
        Some(p) => p,
        None => {
            if !cli.quiet {
                eprintln!("Password for {account}:");
            }
            let mut line = String::new();
            std::io::stdin().lock().read_line(&mut line)?;
            line.trim_end_matches(['\r', '\n']).to_string()
        }
    };

    if password.is_empty() {
        bail!("Empty password");
    }

    store_password(&account, &password)?;
    info!(account = %account, "Password stored");

    if !cli.quiet {
        println!("Password stored for {account}");
    }
    Ok(())
}

async fn remove_password(cli: &Cli) -> Result<()> {
    let config = Config::load().await?;
    let account = config.keychain_account()?;
    delete_password(&account)?;

    if !cli.quiet {
        println!("Password removed for {account}");
    }
    Ok(())
}
