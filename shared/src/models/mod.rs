//! Data models
//!
//! Shared between the data service client, the core and the presentation
//! layer (via JSON). Wire names follow the existing frontend: camelCase for
//! structured types, flat field bags for business records.

pub mod actor;
pub mod approval;
pub mod capability;
pub mod plant;
pub mod record;
pub mod role;

// Re-exports
pub use actor::Actor;
pub use approval::{ActionType, PendingRequest, RequestStatus};
pub use capability::Capabilities;
pub use plant::Plant;
pub use record::Record;
pub use role::Role;
