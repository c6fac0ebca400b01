// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `StackQuota` Services
//!
//! OpenStack service clients implementing the `stackquota-core` traits.
//!
//! | Service | Project | Trait | Catalog types |
//! |---------|---------|-------|---------------|
//! | Compute | Nova | `ComputeApi` | `compute` |
//! | Block storage | Cinder | `VolumeApi` | `volumev3`, `block-storage`, `volumev2`, `volume` |
//! | Network | Neutron | `NetworkApi` | `network` |
//!
//! Service availability comes from the identity catalog
//! ([`catalog::SessionCatalog`]).
//!
//! ## Usage
//!
//! ```ignore
//! use stackquota_services::OpenStackCloud;
//!
//! let cloud = OpenStackCloud::connect(http, &credentials, filter).await?;
//! let aggregator = cloud.aggregator(settings, reporter);
//! let usages = aggregator.get_tenant_quota_usages(cloud.project_id(), None).await?;
//! ```

pub mod catalog;
pub mod cloud;
pub mod endpoint;
pub mod error;
pub mod registry;

// Service modules
pub mod cinder;
pub mod neutron;
pub mod nova;

pub use catalog::SessionCatalog;
pub use cinder::CinderClient;
pub use cloud::OpenStackCloud;
pub use endpoint::ServiceEndpoint;
pub use error::ServiceError;
pub use neutron::NeutronClient;
pub use nova::NovaClient;
pub use registry::{ServiceDescriptor, ServiceRegistry};
