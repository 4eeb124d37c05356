//! Approval workflow
//!
//! Turns blocked edits and deletes into pending requests and replays them
//! once a reviewer approves.

mod engine;
mod error;
mod types;

pub use engine::{ApprovalEngine, DEFAULT_APPROVAL_PARTITION};
pub use error::{ApprovalError, ApprovalResult};
pub use types::{Decision, MutationIntent, MutationOutcome, SubmitRequest};
