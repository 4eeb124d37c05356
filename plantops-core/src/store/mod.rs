//! Plant-routed record store
//!
//! - [`PartitionRouter`] maps an entity and plant to a partition key
//! - [`PlantStore`] fans reads out and routes writes
//! - [`Partition`] is the unrouted handle both are built on

mod error;
mod plant_store;
mod router;
mod sort;

pub use error::{StoreError, StoreResult};
pub use plant_store::{Partition, PlantStore};
pub use router::{PartitionRouter, PlantRegistry};
pub use sort::{SortOrder, SortSpec, sort_records};
