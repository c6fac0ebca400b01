//! Domain models for `StackQuota`.
//!
//! ## Submodules
//!
//! - [`limit`] - Quota values (`Limit`) and per-resource usage (`ResourceQuota`)
//! - [`usages`] - The aggregated `QuotaUsages` snapshot and its builder
//! - [`service`] - Backend services and the quota fields each one owns
//! - [`limits`] - Raw backend documents (`AbsoluteLimits`, `QuotaSet`, `QuotaDetail`)
//! - [`network`] - Network resources counted for usage

mod limit;
mod limits;
mod network;
mod service;
mod usages;

pub use limit::{Limit, ResourceQuota};
pub use limits::{AbsoluteLimits, QuotaDetail, QuotaSet};
pub use network::{NetworkResource, SecurityGroup, SecurityGroupRule};
pub use service::{
    CINDER_QUOTA_FIELDS, NEUTRON_QUOTA_FIELDS, NOVA_QUOTA_FIELDS, ServiceAvailability, ServiceKind, all_quota_fields,
};
pub use usages::{QuotaUsages, QuotaUsagesBuilder};
