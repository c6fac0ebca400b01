//! Collaborator traits for `StackQuota`.
//!
//! The aggregator never talks HTTP itself. It consumes these traits, which the
//! `stackquota-services` crate implements against real OpenStack endpoints and
//! which tests implement with in-memory mocks.
//!
//! The traits are object safe (`async_trait`) so the aggregator can hold them
//! as `Arc<dyn ...>`.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::{
    AbsoluteLimits, NetworkResource, QuotaDetail, QuotaSet, SecurityGroup, ServiceKind,
};
use std::collections::BTreeMap;

/// Answers whether a backend service is deployed in this cloud.
#[async_trait]
pub trait ServiceCatalog: Send + Sync {
    /// Returns true if `service` is enabled.
    ///
    /// An `Err` means the answer is unknown; callers treat it as fatal rather
    /// than as "disabled".
    async fn is_service_enabled(&self, service: ServiceKind) -> Result<bool, CoreError>;
}

/// Compute service (Nova) operations used for quota reporting.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Absolute limits for `tenant_id`, with reserved resources counted as used.
    async fn tenant_absolute_limits(&self, tenant_id: &str) -> Result<AbsoluteLimits, CoreError>;

    /// Quota ceilings configured for `tenant_id`.
    async fn tenant_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError>;

    /// Cloud-wide default quota ceilings.
    async fn default_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError>;
}

/// Block-storage service (Cinder) operations used for quota reporting.
#[async_trait]
pub trait VolumeApi: Send + Sync {
    /// Absolute limits for `tenant_id`.
    async fn tenant_absolute_limits(&self, tenant_id: &str) -> Result<AbsoluteLimits, CoreError>;

    /// Quota ceilings configured for `tenant_id`.
    async fn tenant_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError>;

    /// Cloud-wide default quota ceilings.
    async fn default_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError>;
}

/// Network service (Neutron) operations used for quota reporting.
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// Returns true if the API extension with `alias` is loaded.
    async fn is_extension_supported(&self, alias: &str) -> Result<bool, CoreError>;

    /// Quota ceilings configured for `tenant_id`.
    async fn tenant_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError>;

    /// Cloud-wide default quota ceilings.
    async fn default_quota_get(&self, tenant_id: &str) -> Result<QuotaSet, CoreError>;

    /// Per-resource limit, usage, and reservations. Requires the
    /// `quota_details` extension.
    async fn tenant_quota_detail_get(
        &self,
        tenant_id: &str,
    ) -> Result<BTreeMap<String, QuotaDetail>, CoreError>;

    /// Networks owned by `tenant_id`.
    async fn network_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError>;

    /// Subnets owned by `tenant_id`.
    async fn subnet_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError>;

    /// Ports owned by `tenant_id`.
    async fn port_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError>;

    /// Routers owned by `tenant_id`.
    async fn router_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError>;

    /// Floating IPs allocated to `tenant_id`.
    async fn floating_ip_list(&self, tenant_id: &str) -> Result<Vec<NetworkResource>, CoreError>;

    /// Security groups owned by `tenant_id`, with their rules.
    async fn security_group_list(&self, tenant_id: &str) -> Result<Vec<SecurityGroup>, CoreError>;
}

/// What went wrong when a recoverable backend failure is reported.
#[derive(Debug)]
pub struct ErrorContext<'a> {
    /// The service whose fetch failed.
    pub service: ServiceKind,
    /// The tenant being queried.
    pub tenant_id: &'a str,
    /// The underlying failure.
    pub error: &'a CoreError,
}

/// Receives recoverable backend failures.
///
/// Failures passed here do not abort the current call; the failing service's
/// resources are left out of the result instead.
pub trait ErrorReporter: Send + Sync {
    /// Reports a failure with a message suitable for the end user.
    fn report_error(&self, context: &ErrorContext<'_>, user_message: &str);
}
