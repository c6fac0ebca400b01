//! Cinder (block storage) client.
//!
//! ## API Endpoints
//!
//! - `GET /limits?project_id={t}` - Absolute limits
//! - `GET /os-quota-sets/{t}` - Tenant quota set
//! - `GET /os-quota-sets/{t}/defaults` - Default quota set

mod api;
pub(crate) mod parser;

pub use api::CinderClient;
