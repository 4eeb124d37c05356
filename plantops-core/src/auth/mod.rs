//! Authorization module
//!
//! Role capability table and the evaluator that applies it.

pub mod permissions;

pub use permissions::{
    Disposition, MutationKind, PagePlantPolicy, PermissionEvaluator, ROLE_CAPABILITIES, can_review,
    classify, role_capabilities,
};
