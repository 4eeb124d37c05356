//! PlantOps Core - access control and plant-routed records
//!
//! # Architecture
//!
//! Every create, edit or delete is classified against the actor's role
//! before it reaches storage. Direct mutations go straight to the record
//! store; gated ones are captured as approval requests and replayed through
//! the same store path once a reviewer approves them.
//!
//! # Module layout
//!
//! ```text
//! plantops-core/src/
//! ├── auth/          # Role capability table, permission evaluator
//! ├── store/         # Partition routing, fan-out reads, routed writes
//! ├── approval/      # Approval workflow engine
//! ├── core/          # Configuration, assembled state
//! └── utils/         # Logger, error conversions
//! ```

pub mod approval;
pub mod auth;
pub mod core;
pub mod store;
pub mod utils;

// Re-export public types
pub use approval::{
    ApprovalEngine, ApprovalError, ApprovalResult, Decision, MutationIntent, MutationOutcome,
    SubmitRequest,
};
pub use auth::{Disposition, MutationKind, PagePlantPolicy, PermissionEvaluator};
pub use crate::core::{Config, CoreState};
pub use store::{
    Partition, PartitionRouter, PlantRegistry, PlantStore, SortOrder, SortSpec, StoreError,
    StoreResult,
};

// Re-export unified error types from shared
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}
