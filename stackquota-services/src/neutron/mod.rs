//! Neutron (network) client.
//!
//! ## API Endpoints
//!
//! - `GET /v2.0/extensions` - Loaded API extensions (fetched once per client)
//! - `GET /v2.0/quotas/{t}` - Tenant quota set
//! - `GET /v2.0/quotas/{t}/default` - Default quota set
//! - `GET /v2.0/quotas/{t}/details` - Limit, usage, and reservations
//! - `GET /v2.0/{networks,subnets,ports,routers,floatingips,security-groups}?tenant_id={t}`

mod api;
pub(crate) mod parser;

pub use api::NeutronClient;
