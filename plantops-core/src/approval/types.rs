//! Approval workflow inputs and outputs

use shared::models::{ActionType, PendingRequest, Record};

use crate::auth::MutationKind;

/// Reviewer verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Input to [`ApprovalEngine::submit`](super::ApprovalEngine::submit)
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub action: ActionType,
    pub entity: String,
    /// Proposed new state (edit) or the row being removed (delete). Must
    /// carry `id` and `plant`.
    pub target: Record,
    pub reason: String,
}

impl SubmitRequest {
    pub fn edit(entity: impl Into<String>, target: Record, reason: impl Into<String>) -> Self {
        Self {
            action: ActionType::Edit,
            entity: entity.into(),
            target,
            reason: reason.into(),
        }
    }

    pub fn delete(entity: impl Into<String>, target: Record, reason: impl Into<String>) -> Self {
        Self {
            action: ActionType::Delete,
            entity: entity.into(),
            target,
            reason: reason.into(),
        }
    }
}

/// A mutation as issued by an actor, before classification
#[derive(Debug, Clone)]
pub struct MutationIntent {
    pub kind: MutationKind,
    pub entity: String,
    /// New record (create), new state (edit) or the row to remove (delete)
    pub record: Record,
    /// Only used when the mutation ends up gated
    pub reason: Option<String>,
}

impl MutationIntent {
    pub fn create(entity: impl Into<String>, record: Record) -> Self {
        Self::new(MutationKind::Create, entity, record)
    }

    pub fn edit(entity: impl Into<String>, record: Record) -> Self {
        Self::new(MutationKind::Edit, entity, record)
    }

    pub fn delete(entity: impl Into<String>, record: Record) -> Self {
        Self::new(MutationKind::Delete, entity, record)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    fn new(kind: MutationKind, entity: impl Into<String>, record: Record) -> Self {
        Self {
            kind,
            entity: entity.into(),
            record,
            reason: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// Applied to the store. Carries the stored record for creates and edits.
    Applied(Option<Record>),
    /// Captured for review
    Pending(PendingRequest),
}

impl MutationOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn pending(&self) -> Option<&PendingRequest> {
        match self {
            Self::Pending(request) => Some(request),
            Self::Applied(_) => None,
        }
    }
}
