// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `StackQuota` Store
//!
//! Configuration and credential storage for `StackQuota`.
//!
//! This crate provides:
//!
//! - **Config**: Cloud account, feature switches, and HTTP settings, read from
//!   `config.json` and overlaid by the `OS_*` environment
//! - **Credentials**: Password lookup from `OS_PASSWORD` or the system keychain
//! - **Persistence**: Owner-only JSON file helpers
//!
//! ## Usage
//!
//! ```ignore
//! use stackquota_store::Config;
//!
//! let config = Config::load().await?;
//! let credentials = config.credentials()?;
//! let http = config.http_client()?;
//! ```

pub mod config;
pub mod credentials;
pub mod error;
pub mod persistence;

pub use config::{CloudConfig, Config, FeaturesConfig, HttpConfig};
pub use credentials::{PASSWORD_ENV, account_name, delete_password, get_password, store_password};
pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_config_path, ensure_dir, load_json, load_json_or_default,
    save_json,
};
