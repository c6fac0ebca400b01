// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `StackQuota` Core
//!
//! Core types, models, and traits for `StackQuota`.
//!
//! This crate provides the foundational abstractions used across all other
//! `StackQuota` crates:
//!
//! - Domain models (limits, per-resource usage, quota sets)
//! - Error types
//! - Collaborator traits implemented by the backend service clients
//!
//! ## Key Types
//!
//! ### Quota Types
//! - [`Limit`] - A finite ceiling or unlimited
//! - [`ResourceQuota`] - Quota, usage, and availability of one resource
//! - [`QuotaUsages`] - The aggregated snapshot for one tenant
//! - [`QuotaSet`] - Ceilings without usage
//!
//! ### Backend Documents
//! - [`AbsoluteLimits`] - Raw absolute-limits report
//! - [`QuotaDetail`] - Network quota detail (limit, used, reserved)
//!
//! ### Services
//! - [`ServiceKind`] - Compute, volume, or network, and the fields each owns

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Quota types
    Limit,
    QuotaSet,
    QuotaUsages,
    QuotaUsagesBuilder,
    ResourceQuota,
    // Backend documents
    AbsoluteLimits,
    QuotaDetail,
    // Network resources
    NetworkResource,
    SecurityGroup,
    SecurityGroupRule,
    // Services
    CINDER_QUOTA_FIELDS,
    NEUTRON_QUOTA_FIELDS,
    NOVA_QUOTA_FIELDS,
    ServiceAvailability,
    ServiceKind,
    all_quota_fields,
};

// Re-export traits
pub use traits::{ComputeApi, ErrorContext, ErrorReporter, NetworkApi, ServiceCatalog, VolumeApi};
