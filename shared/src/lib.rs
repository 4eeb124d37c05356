//! Shared types for PlantOps
//!
//! Domain types used across the client and core crates: roles, plants,
//! actors, capability sets, plant-tagged records, pending approval requests,
//! the data service wire envelope and the unified error code system.

pub mod data;
pub mod error;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use data::{DataAction, DataRequest, DataResponse, WriteOp};
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use models::{
    ActionType, Actor, Capabilities, PendingRequest, Plant, Record, RequestStatus, Role,
};
