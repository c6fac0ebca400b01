//! Nova (compute) client.
//!
//! ## API Endpoints
//!
//! - `GET /limits?reserved=1&tenant_id={t}` - Absolute limits, reservations counted as used
//! - `GET /os-quota-sets/{t}` - Tenant quota set
//! - `GET /os-quota-sets/{t}/defaults` - Default quota set

mod api;
pub(crate) mod parser;

pub use api::NovaClient;
