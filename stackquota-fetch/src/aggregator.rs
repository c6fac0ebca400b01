//! Per-tenant quota aggregation across compute, block storage, and network.
//!
//! [`QuotaAggregator`] answers two questions for a tenant:
//!
//! - which quota fields do not apply to this deployment
//!   ([`QuotaAggregator::get_disabled_quotas`]), and
//! - what is the quota, usage, and availability of every field that does
//!   ([`QuotaAggregator::get_tenant_quota_usages`]).
//!
//! Service availability and extension checks are fatal: if the answer is
//! unknown, so is the result. Fetch failures are not: the failing service
//! is reported once through the [`ErrorReporter`] and its fields are left
//! out of the result.

use futures::join;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use stackquota_core::{
    AbsoluteLimits, ComputeApi, CoreError, ErrorContext, ErrorReporter, NEUTRON_QUOTA_FIELDS,
    NetworkApi, QuotaSet, QuotaUsages, QuotaUsagesBuilder, ServiceAvailability, ServiceCatalog,
    ServiceKind, VolumeApi, all_quota_fields,
};

use crate::reporter::TracingReporter;
use crate::settings::QuotaSettings;

/// Message reported when compute limits cannot be fetched.
pub const COMPUTE_LIMITS_MESSAGE: &str = "Unable to retrieve compute limit information.";
/// Message reported when block-storage limits cannot be fetched.
pub const VOLUME_LIMITS_MESSAGE: &str = "Unable to retrieve volume limit information.";
/// Message reported when network quotas or resources cannot be fetched.
pub const NETWORK_QUOTAS_MESSAGE: &str = "Unable to retrieve network quota information.";
/// Message reported when compute quota sets cannot be fetched.
pub const COMPUTE_QUOTAS_MESSAGE: &str = "Unable to retrieve compute quota information.";

/// Extension aliases the network checks depend on.
mod extension {
    pub const SECURITY_GROUP: &str = "security-group";
    pub const ROUTER: &str = "router";
    pub const QUOTAS: &str = "quotas";
    pub const QUOTA_DETAILS: &str = "quota_details";
}

/// Compute fields reported with usage: (field, limit key, used key).
const COMPUTE_USAGE_KEYS: &[(&str, &str, &str)] = &[
    ("instances", "maxTotalInstances", "totalInstancesUsed"),
    ("cores", "maxTotalCores", "totalCoresUsed"),
    ("ram", "maxTotalRAMSize", "totalRAMUsed"),
    ("server_groups", "maxServerGroups", "totalServerGroupsUsed"),
];

/// Compute fields whose usage the limits report does not carry.
const COMPUTE_QUOTA_KEYS: &[(&str, &str)] = &[
    ("key_pairs", "maxTotalKeypairs"),
    ("metadata_items", "maxServerMeta"),
    ("injected_files", "maxPersonality"),
    ("injected_file_content_bytes", "maxPersonalitySize"),
    ("server_group_members", "maxServerGroupMembers"),
];

/// Block-storage fields reported with usage.
const VOLUME_USAGE_KEYS: &[(&str, &str, &str)] = &[
    ("volumes", "maxTotalVolumes", "totalVolumesUsed"),
    ("gigabytes", "maxTotalVolumeGigabytes", "totalGigabytesUsed"),
    ("snapshots", "maxTotalSnapshots", "totalSnapshotsUsed"),
];

type FieldSet = BTreeSet<&'static str>;

/// Which quota-set document to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuotaSource {
    Tenant,
    Defaults,
}

// ============================================================================
// Quota Aggregator
// ============================================================================

/// Combines the three backend services into one quota view per tenant.
pub struct QuotaAggregator {
    catalog: Arc<dyn ServiceCatalog>,
    compute: Arc<dyn ComputeApi>,
    volume: Arc<dyn VolumeApi>,
    network: Arc<dyn NetworkApi>,
    reporter: Arc<dyn ErrorReporter>,
    settings: QuotaSettings,
}

impl std::fmt::Debug for QuotaAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaAggregator")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl QuotaAggregator {
    /// Creates an aggregator with default settings that logs failures.
    pub fn new(
        catalog: Arc<dyn ServiceCatalog>,
        compute: Arc<dyn ComputeApi>,
        volume: Arc<dyn VolumeApi>,
        network: Arc<dyn NetworkApi>,
    ) -> Self {
        Self {
            catalog,
            compute,
            volume,
            network,
            reporter: Arc::new(TracingReporter),
            settings: QuotaSettings::default(),
        }
    }

    /// Sets where recoverable failures are reported.
    pub fn with_reporter(mut self, reporter: Arc<dyn ErrorReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Sets the deployment feature switches.
    pub fn with_settings(mut self, settings: QuotaSettings) -> Self {
        self.settings = settings;
        self
    }

    /// The feature switches in use.
    pub fn settings(&self) -> &QuotaSettings {
        &self.settings
    }

    // ========================================================================
    // Public Operations
    // ========================================================================

    /// Quota fields that do not apply to this deployment.
    ///
    /// The checks are cloud-wide. `tenant_id` only labels the trace span.
    #[instrument(skip(self))]
    pub async fn get_disabled_quotas(&self, tenant_id: &str) -> Result<BTreeSet<String>, CoreError> {
        self.get_disabled_quotas_for(None).await
    }

    /// Quota fields to ignore when only `targets` are of interest.
    ///
    /// Fields outside `targets` are always included, so the result is the
    /// complement of the enabled fields among `targets`. Services owning no
    /// target are not checked.
    #[instrument(skip(self))]
    pub async fn get_disabled_quotas_for(
        &self,
        targets: Option<&[&str]>,
    ) -> Result<BTreeSet<String>, CoreError> {
        let candidates = candidate_fields(targets);
        let disabled = self.resolve_disabled(&candidates).await?;
        let enabled: FieldSet = candidates.difference(&disabled).copied().collect();

        Ok(all_quota_fields()
            .into_iter()
            .filter(|field| !enabled.contains(field))
            .map(str::to_string)
            .collect())
    }

    /// Quota, usage, and availability of every enabled field for `tenant_id`.
    ///
    /// With `targets`, only those fields are computed and returned, and
    /// services owning none of them are not contacted.
    #[instrument(skip(self, targets), fields(targets = ?targets))]
    pub async fn get_tenant_quota_usages(
        &self,
        tenant_id: &str,
        targets: Option<&[&str]>,
    ) -> Result<QuotaUsages, CoreError> {
        let enabled = self.enabled_fields(targets).await?;
        debug!(fields = enabled.len(), "Resolved enabled quota fields");

        // All extension checks finish before any fetch starts.
        let use_details = wants_service(&enabled, ServiceKind::Network)
            && self
                .network
                .is_extension_supported(extension::QUOTA_DETAILS)
                .await?;

        let (compute, network, volume) = join!(
            self.compute_usages(tenant_id, &enabled),
            self.network_usages(tenant_id, &enabled, use_details),
            self.volume_usages(tenant_id, &enabled),
        );

        let mut builder = QuotaUsages::builder();
        builder.merge(compute).merge(network).merge(volume);
        builder.retain(|name| enabled.contains(name));

        let usages = builder.build();
        info!(resources = usages.len(), "Quota usages aggregated");
        Ok(usages)
    }

    /// Raw absolute limits from compute and block storage, merged.
    ///
    /// A service that is not deployed contributes nothing. A service that
    /// fails is reported and contributes nothing.
    #[instrument(skip(self))]
    pub async fn tenant_limit_usages(&self, tenant_id: &str) -> Result<AbsoluteLimits, CoreError> {
        let compute_enabled = self.catalog.is_service_enabled(ServiceKind::Compute).await?;
        let volume_enabled = self.catalog.is_service_enabled(ServiceKind::Volume).await?;

        let (compute, volume) = join!(
            async {
                if compute_enabled {
                    Some(self.compute.tenant_absolute_limits(tenant_id).await)
                } else {
                    None
                }
            },
            async {
                if volume_enabled {
                    Some(self.volume.tenant_absolute_limits(tenant_id).await)
                } else {
                    None
                }
            },
        );

        let mut limits = AbsoluteLimits::new();
        for (service, result, message) in [
            (ServiceKind::Compute, compute, COMPUTE_LIMITS_MESSAGE),
            (ServiceKind::Volume, volume, VOLUME_LIMITS_MESSAGE),
        ] {
            match result {
                Some(Ok(fetched)) => limits.merge(fetched),
                Some(Err(error)) => self.report(service, tenant_id, &error, message),
                None => {}
            }
        }

        Ok(limits)
    }

    /// Quota ceilings configured for `tenant_id`, enabled fields only.
    #[instrument(skip(self, targets))]
    pub async fn get_tenant_quota_data(
        &self,
        tenant_id: &str,
        targets: Option<&[&str]>,
    ) -> Result<QuotaSet, CoreError> {
        self.quota_data(tenant_id, targets, QuotaSource::Tenant).await
    }

    /// Cloud-wide default ceilings, enabled fields only.
    #[instrument(skip(self, targets))]
    pub async fn get_default_quota_data(
        &self,
        tenant_id: &str,
        targets: Option<&[&str]>,
    ) -> Result<QuotaSet, CoreError> {
        self.quota_data(tenant_id, targets, QuotaSource::Defaults).await
    }

    /// Checks all three services concurrently.
    #[instrument(skip(self))]
    pub async fn service_availability(&self) -> Result<ServiceAvailability, CoreError> {
        let (compute, volume, network) = join!(
            self.catalog.is_service_enabled(ServiceKind::Compute),
            self.catalog.is_service_enabled(ServiceKind::Volume),
            self.catalog.is_service_enabled(ServiceKind::Network),
        );

        Ok(ServiceAvailability {
            compute: compute?,
            volume: volume?,
            network: network?,
        })
    }

    // ========================================================================
    // Disabled Fields
    // ========================================================================

    async fn enabled_fields(&self, targets: Option<&[&str]>) -> Result<FieldSet, CoreError> {
        let candidates = candidate_fields(targets);
        let disabled = self.resolve_disabled(&candidates).await?;
        Ok(candidates.difference(&disabled).copied().collect())
    }

    /// Disabled fields among `candidates`' services. Each service is checked
    /// at most once, and only if it owns a candidate.
    async fn resolve_disabled(&self, candidates: &FieldSet) -> Result<FieldSet, CoreError> {
        let mut disabled = FieldSet::new();

        if wants_service(candidates, ServiceKind::Volume)
            && !self.catalog.is_service_enabled(ServiceKind::Volume).await?
        {
            debug!("Volume service disabled");
            disabled.extend(ServiceKind::Volume.quota_fields());
        }

        if wants_service(candidates, ServiceKind::Network) {
            disabled.extend(self.disabled_network_fields(candidates).await?);
        }

        if wants_service(candidates, ServiceKind::Compute) {
            let compute_enabled = self.catalog.is_service_enabled(ServiceKind::Compute).await?;
            if !(compute_enabled && self.settings.nova_quotas_enabled) {
                debug!(compute_enabled, "Compute quotas disabled");
                disabled.extend(ServiceKind::Compute.quota_fields());
            }
        }

        Ok(disabled)
    }

    async fn disabled_network_fields(&self, candidates: &FieldSet) -> Result<FieldSet, CoreError> {
        let all_network: FieldSet = NEUTRON_QUOTA_FIELDS.iter().copied().collect();

        if !self.catalog.is_service_enabled(ServiceKind::Network).await? {
            debug!("Network service disabled");
            return Ok(all_network);
        }

        if !(self.settings.neutron.enable_quotas
            && self.network.is_extension_supported(extension::QUOTAS).await?)
        {
            debug!("Network quotas not managed");
            return Ok(all_network);
        }

        let mut disabled = FieldSet::new();

        if wants_any(candidates, &["security_group", "security_group_rule"])
            && !self
                .network
                .is_extension_supported(extension::SECURITY_GROUP)
                .await?
        {
            disabled.extend(["security_group", "security_group_rule"]);
        }

        if wants_any(candidates, &["router", "floatingip"]) {
            let router_enabled = self.settings.neutron.enable_router
                && self.network.is_extension_supported(extension::ROUTER).await?;
            if !router_enabled {
                disabled.extend(["router", "floatingip"]);
            } else if !self.settings.neutron.enable_floating_ip {
                disabled.insert("floatingip");
            }
        }

        Ok(disabled)
    }

    // ========================================================================
    // Per-Service Usage
    // ========================================================================

    async fn compute_usages(&self, tenant_id: &str, enabled: &FieldSet) -> QuotaUsagesBuilder {
        let mut builder = QuotaUsagesBuilder::new();
        if !wants_service(enabled, ServiceKind::Compute) {
            return builder;
        }

        match self.compute.tenant_absolute_limits(tenant_id).await {
            Ok(limits) => {
                add_limit_rows(&mut builder, &limits, COMPUTE_USAGE_KEYS);
                for (field, limit_key) in COMPUTE_QUOTA_KEYS {
                    if let Some(limit) = limits.limit(limit_key) {
                        builder.add_quota(*field, limit);
                    }
                }
            }
            Err(error) => {
                self.report(ServiceKind::Compute, tenant_id, &error, COMPUTE_LIMITS_MESSAGE);
            }
        }

        builder
    }

    async fn volume_usages(&self, tenant_id: &str, enabled: &FieldSet) -> QuotaUsagesBuilder {
        let mut builder = QuotaUsagesBuilder::new();
        if !wants_service(enabled, ServiceKind::Volume) {
            return builder;
        }

        match self.volume.tenant_absolute_limits(tenant_id).await {
            Ok(limits) => add_limit_rows(&mut builder, &limits, VOLUME_USAGE_KEYS),
            Err(error) => {
                self.report(ServiceKind::Volume, tenant_id, &error, VOLUME_LIMITS_MESSAGE);
            }
        }

        builder
    }

    async fn network_usages(
        &self,
        tenant_id: &str,
        enabled: &FieldSet,
        use_details: bool,
    ) -> QuotaUsagesBuilder {
        let fields: Vec<&'static str> = NEUTRON_QUOTA_FIELDS
            .iter()
            .copied()
            .filter(|field| enabled.contains(field))
            .collect();
        if fields.is_empty() {
            return QuotaUsagesBuilder::new();
        }

        let fetched = if use_details {
            self.network_usages_from_details(tenant_id, &fields).await
        } else {
            self.network_usages_from_lists(tenant_id, &fields).await
        };

        match fetched {
            Ok(builder) => builder,
            Err(error) => {
                self.report(ServiceKind::Network, tenant_id, &error, NETWORK_QUOTAS_MESSAGE);
                QuotaUsagesBuilder::new()
            }
        }
    }

    async fn network_usages_from_details(
        &self,
        tenant_id: &str,
        fields: &[&'static str],
    ) -> Result<QuotaUsagesBuilder, CoreError> {
        let details = self.network.tenant_quota_detail_get(tenant_id).await?;

        let mut builder = QuotaUsagesBuilder::new();
        for field in fields {
            if let Some(detail) = details.get(*field) {
                builder.add_limit_and_usage(*field, detail.limit, detail.in_use());
            }
        }
        Ok(builder)
    }

    /// Ceilings from the quota set, usage by counting the tenant's resources.
    async fn network_usages_from_lists(
        &self,
        tenant_id: &str,
        fields: &[&'static str],
    ) -> Result<QuotaUsagesBuilder, CoreError> {
        let quotas = self.network.tenant_quota_get(tenant_id).await?;

        let mut builder = QuotaUsagesBuilder::new();
        for field in fields {
            if let Some(limit) = quotas.get(field) {
                builder.add_quota(*field, limit);
            }
        }

        if builder.contains("network") {
            let networks = self.network.network_list(tenant_id).await?;
            builder.tally("network", count(networks.len()));
        }
        if builder.contains("subnet") {
            let subnets = self.network.subnet_list(tenant_id).await?;
            builder.tally("subnet", count(subnets.len()));
        }
        if builder.contains("port") {
            let ports = self.network.port_list(tenant_id).await?;
            builder.tally("port", count(ports.len()));
        }
        if builder.contains("router") {
            let routers = self.network.router_list(tenant_id).await?;
            builder.tally("router", count(routers.len()));
        }
        if builder.contains("floatingip") {
            let floating_ips = self.network.floating_ip_list(tenant_id).await?;
            builder.tally("floatingip", count(floating_ips.len()));
        }
        if builder.contains("security_group") || builder.contains("security_group_rule") {
            let groups = self.network.security_group_list(tenant_id).await?;
            let rules: usize = groups.iter().map(|g| g.security_group_rules.len()).sum();
            builder
                .tally("security_group", count(groups.len()))
                .tally("security_group_rule", count(rules));
        }

        Ok(builder)
    }

    // ========================================================================
    // Quota Sets
    // ========================================================================

    async fn quota_data(
        &self,
        tenant_id: &str,
        targets: Option<&[&str]>,
        source: QuotaSource,
    ) -> Result<QuotaSet, CoreError> {
        let enabled = self.enabled_fields(targets).await?;

        let (compute, network, volume) = join!(
            self.service_quota_set(ServiceKind::Compute, tenant_id, source, &enabled),
            self.service_quota_set(ServiceKind::Network, tenant_id, source, &enabled),
            self.service_quota_set(ServiceKind::Volume, tenant_id, source, &enabled),
        );

        let mut quotas = QuotaSet::new();
        quotas.merge(compute);
        quotas.merge(network);
        quotas.merge(volume);
        quotas.retain(|name| enabled.contains(name));
        Ok(quotas)
    }

    async fn service_quota_set(
        &self,
        service: ServiceKind,
        tenant_id: &str,
        source: QuotaSource,
        enabled: &FieldSet,
    ) -> QuotaSet {
        if !wants_service(enabled, service) {
            return QuotaSet::new();
        }

        let result = match (service, source) {
            (ServiceKind::Compute, QuotaSource::Tenant) => {
                self.compute.tenant_quota_get(tenant_id).await
            }
            (ServiceKind::Compute, QuotaSource::Defaults) => {
                self.compute.default_quota_get(tenant_id).await
            }
            (ServiceKind::Volume, QuotaSource::Tenant) => {
                self.volume.tenant_quota_get(tenant_id).await
            }
            (ServiceKind::Volume, QuotaSource::Defaults) => {
                self.volume.default_quota_get(tenant_id).await
            }
            (ServiceKind::Network, QuotaSource::Tenant) => {
                self.network.tenant_quota_get(tenant_id).await
            }
            (ServiceKind::Network, QuotaSource::Defaults) => {
                self.network.default_quota_get(tenant_id).await
            }
        };

        result.unwrap_or_else(|error| {
            let message = match service {
                ServiceKind::Compute => COMPUTE_QUOTAS_MESSAGE,
                ServiceKind::Volume => VOLUME_LIMITS_MESSAGE,
                ServiceKind::Network => NETWORK_QUOTAS_MESSAGE,
            };
            self.report(service, tenant_id, &error, message);
            QuotaSet::new()
        })
    }

    fn report(&self, service: ServiceKind, tenant_id: &str, error: &CoreError, message: &str) {
        warn!(service = %service, error = %error, "Omitting service from quota results");
        self.reporter.report_error(
            &ErrorContext {
                service,
                tenant_id,
                error,
            },
            message,
        );
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Known quota fields, restricted to `targets` when given. Unknown target
/// names are dropped.
fn candidate_fields(targets: Option<&[&str]>) -> FieldSet {
    all_quota_fields()
        .into_iter()
        .filter(|field| targets.is_none_or(|targets| targets.contains(field)))
        .collect()
}

fn wants_service(fields: &FieldSet, service: ServiceKind) -> bool {
    service.quota_fields().iter().any(|field| fields.contains(field))
}

fn wants_any(fields: &FieldSet, names: &[&str]) -> bool {
    names.iter().any(|name| fields.contains(name))
}

fn add_limit_rows(
    builder: &mut QuotaUsagesBuilder,
    limits: &AbsoluteLimits,
    rows: &[(&'static str, &str, &str)],
) {
    for (field, limit_key, used_key) in rows {
        if let Some(limit) = limits.limit(limit_key) {
            builder.add_limit_and_usage(*field, limit, limits.used(used_key).unwrap_or(0));
        }
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

// ============================================================================
// Tests
// ============================================================================
