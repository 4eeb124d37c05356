//! PlantOps Client - remote data service access
//!
//! The record store never talks to storage directly; every read and write is
//! one request/response exchange with the data service. This crate defines
//! that contract ([`DataService`]) and its implementations:
//!
//! - [`HttpDataService`] - JSON over HTTP (reqwest)
//! - [`MemoryDataService`] - in-process partitions for tests (`in-process` feature)

pub mod config;
pub mod error;
pub mod http;
#[cfg(feature = "in-process")]
pub mod memory;
pub mod service;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpDataService;
#[cfg(feature = "in-process")]
pub use memory::{JournalEntry, MemoryDataService};
pub use service::DataService;

// Re-export shared wire types for convenience
pub use shared::data::{DataAction, DataRequest, DataResponse, WriteOp};
pub use shared::models::Record;
