// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `StackQuota` Fetch
//!
//! Quota aggregation and the HTTP plumbing underneath it.
//!
//! ## Aggregation
//!
//! - [`aggregator::QuotaAggregator`] - Combines compute, block storage, and
//!   network into one per-tenant quota view
//! - [`settings::QuotaSettings`] - Deployment feature switches
//! - [`reporter`] - Where recoverable backend failures go
//!
//! ## Transport
//!
//! - [`http::HttpClient`] - `reqwest` wrapper with token auth and retries
//! - [`session::Session`] - Keystone v3 token and service catalog
//! - [`retry::RetryStrategy`] - Backoff policy
//!
//! ## Example
//!
//! ```ignore
//! use stackquota_fetch::QuotaAggregator;
//!
//! let aggregator = QuotaAggregator::new(catalog, nova, cinder, neutron);
//! let usages = aggregator
//!     .get_tenant_quota_usages(&tenant_id, Some(&["instances", "cores"]))
//!     .await?;
//! ```

pub mod aggregator;
pub mod error;
pub mod http;
pub mod reporter;
pub mod retry;
pub mod session;
pub mod settings;

// Aggregation
pub use aggregator::{
    COMPUTE_LIMITS_MESSAGE, COMPUTE_QUOTAS_MESSAGE, NETWORK_QUOTAS_MESSAGE, QuotaAggregator,
    VOLUME_LIMITS_MESSAGE,
};
pub use reporter::{CollectingReporter, ReportedError, TracingReporter};
pub use settings::{NeutronSettings, QuotaSettings};

// Errors
pub use error::FetchError;

// Transport
pub use http::HttpClient;
pub use retry::RetryStrategy;
pub use session::{CatalogEndpoint, CatalogEntry, Credentials, EndpointFilter, Interface, Session};
