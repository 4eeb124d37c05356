//! Approval workflow engine
//!
//! Gated edits and deletes are captured as pending requests in a dedicated
//! partition. Approval replays the captured mutation through the same store
//! call the direct path uses; rejection only records the verdict.

use chrono::Utc;
use dashmap::DashSet;
use shared::models::{ActionType, Actor, PendingRequest, Plant, Record, RequestStatus};

use super::{ApprovalError, ApprovalResult, Decision, MutationIntent, MutationOutcome, SubmitRequest};
use crate::auth::{Disposition, MutationKind, PermissionEvaluator, can_review, classify};
use crate::security_log;
use crate::store::{Partition, PlantStore, StoreError, StoreResult};

/// Default partition holding approval requests
pub const DEFAULT_APPROVAL_PARTITION: &str = "approval_requests";

/// Writes of a verdict attempted before giving up
const VERDICT_WRITE_ATTEMPTS: usize = 3;

pub struct ApprovalEngine {
    store: PlantStore,
    evaluator: PermissionEvaluator,
    partition: String,
    /// Request ids with a decision in progress in this process
    in_flight: DashSet<String>,
}

/// Releases an in-flight claim when dropped
struct Claim<'a> {
    set: &'a DashSet<String>,
    id: String,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.id);
    }
}

impl ApprovalEngine {
    pub fn new(store: PlantStore, evaluator: PermissionEvaluator) -> Self {
        Self::with_partition(store, evaluator, DEFAULT_APPROVAL_PARTITION)
    }

    pub fn with_partition(
        store: PlantStore,
        evaluator: PermissionEvaluator,
        partition: impl Into<String>,
    ) -> Self {
        Self {
            store,
            evaluator,
            partition: partition.into(),
            in_flight: DashSet::new(),
        }
    }

    pub fn store(&self) -> &PlantStore {
        &self.store
    }

    pub fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    pub fn approval_partition(&self) -> &str {
        &self.partition
    }

    fn approvals(&self) -> Partition {
        self.store.partition(self.partition.as_str())
    }

    /// Classify a mutation and either apply it or capture it for review
    pub async fn execute(&self, actor: &Actor, intent: MutationIntent) -> ApprovalResult<MutationOutcome> {
        let caps = self.evaluator.for_actor(actor);

        match classify(&caps, intent.kind) {
            Disposition::Direct => {
                let record = self.apply(intent.kind, &intent.entity, intent.record).await?;
                Ok(MutationOutcome::Applied(record))
            }
            Disposition::NeedsApproval => {
                let Some(action) = intent.kind.action_type() else {
                    return Err(self.deny(actor, intent.kind, &intent.entity));
                };
                let request = SubmitRequest {
                    action,
                    entity: intent.entity,
                    target: intent.record,
                    reason: intent.reason.unwrap_or_default(),
                };
                let pending = self.submit(actor, request).await?;
                Ok(MutationOutcome::Pending(pending))
            }
            Disposition::Forbidden => Err(self.deny(actor, intent.kind, &intent.entity)),
        }
    }

    /// Record a gated edit or delete as a pending request
    pub async fn submit(&self, actor: &Actor, request: SubmitRequest) -> ApprovalResult<PendingRequest> {
        let caps = self.evaluator.for_actor(actor);
        let kind = MutationKind::from(request.action);

        match classify(&caps, kind) {
            Disposition::NeedsApproval => {}
            Disposition::Direct => {
                return Err(ApprovalError::ApprovalNotRequired {
                    role: actor.role.clone(),
                    action: request.action,
                });
            }
            Disposition::Forbidden => return Err(self.deny(actor, kind, &request.entity)),
        }

        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(ApprovalError::ReasonRequired);
        }
        let entity = request.entity.trim();
        if entity.is_empty() {
            return Err(ApprovalError::InvalidTarget("entity type is required".into()));
        }
        let target_id = request
            .target
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApprovalError::InvalidTarget("target record has no id".into()))?;
        let target_plant = request
            .target
            .plant
            .clone()
            .ok_or_else(|| ApprovalError::InvalidTarget("target record has no plant".into()))?;
        self.store
            .route(entity, &target_plant)
            .map_err(|e| ApprovalError::InvalidTarget(e.to_string()))?;

        let mut pending = PendingRequest {
            id: None,
            action_type: request.action,
            target_entity_type: entity.to_string(),
            target_id,
            target_plant,
            target_data: request.target.clone(),
            reason: reason.to_string(),
            requested_by: actor.display_name.clone(),
            requested_by_role: actor.role.clone(),
            requested_by_plant: actor.plant.clone(),
            status: RequestStatus::Pending,
            requested_at: Utc::now(),
            resolved_at: None,
            resolved_by: None,
            resolution_note: None,
            applying_by: None,
            applying_at: None,
        };

        let row = to_row(&pending).map_err(ApprovalError::NotRecorded)?;
        let stored = self.approvals().create(row).await.map_err(|e| {
            tracing::error!(
                partition = %self.partition,
                entity = %pending.target_entity_type,
                target_id = %pending.target_id,
                error = %e,
                "failed to record approval request"
            );
            ApprovalError::NotRecorded(e)
        })?;
        pending.id = stored.id;

        tracing::info!(
            request_id = pending.id.as_deref().unwrap_or_default(),
            action = %pending.action_type,
            entity = %pending.target_entity_type,
            target_id = %pending.target_id,
            plant = %pending.target_plant,
            requested_by = %pending.requested_by,
            "approval request submitted"
        );
        Ok(pending)
    }

    /// Approve or reject a pending request
    pub async fn decide(
        &self,
        reviewer: &Actor,
        request_id: &str,
        decision: Decision,
        note: Option<String>,
    ) -> ApprovalResult<PendingRequest> {
        // 1. Claim the id for this process
        let _claim = self.claim(request_id)?;

        // 2. Re-read the current state
        let mut request = self.load(request_id).await?;

        // 3. Terminal states are immutable
        if !request.is_pending() {
            return Err(ApprovalError::NotPending {
                id: request_id.to_string(),
                status: Some(request.status),
            });
        }

        // 4. Reviewer must hold the direct capability
        let caps = self.evaluator.for_actor(reviewer);
        if !can_review(&caps, request.action_type) {
            security_log!(
                "WARN",
                "review_denied",
                role = reviewer.role.clone(),
                reviewer = reviewer.display_name.clone(),
                request_id = request_id.to_string(),
                action = request.action_type.as_str()
            );
            return Err(ApprovalError::Forbidden(format!(
                "role {} cannot review {} requests",
                reviewer.role, request.action_type
            )));
        }

        // 5. An approval already applying can only be finished
        let approved = decision == Decision::Approve;
        if request.is_applying() && !approved {
            return Err(ApprovalError::NotPending {
                id: request_id.to_string(),
                status: None,
            });
        }

        // 6. Mark, then replay; a failed replay leaves the request pending
        if approved {
            self.apply_approval(reviewer, request_id, &mut request).await?;
        }

        // 7. Record the verdict
        request.status = if approved {
            RequestStatus::Approved
        } else {
            RequestStatus::Rejected
        };
        request.resolved_at = Some(Utc::now());
        request.resolved_by = Some(reviewer.display_name.clone());
        request.resolution_note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        if let Err(source) = self.record_verdict(request_id, &request).await {
            tracing::error!(
                request_id = %request_id,
                applied = approved,
                error = %source,
                "failed to record approval resolution"
            );
            return Err(ApprovalError::ResolutionNotRecorded {
                request_id: request_id.to_string(),
                applied: approved,
                source,
            });
        }

        tracing::info!(
            request_id = %request_id,
            status = %request.status,
            resolved_by = %reviewer.display_name,
            "approval request resolved"
        );
        Ok(request)
    }

    /// Requests in one status, newest first. `None` lists the pending queue.
    pub async fn list(&self, status: Option<RequestStatus>) -> ApprovalResult<Vec<PendingRequest>> {
        let status = status.unwrap_or(RequestStatus::Pending);
        let requests = self
            .read_requests()
            .await?
            .into_iter()
            .filter(|r| r.status == status)
            .collect();
        Ok(newest_first(requests))
    }

    /// Every request regardless of status, newest first
    pub async fn list_all(&self) -> ApprovalResult<Vec<PendingRequest>> {
        Ok(newest_first(self.read_requests().await?))
    }

    pub async fn get(&self, request_id: &str) -> ApprovalResult<PendingRequest> {
        self.load(request_id).await
    }

    fn claim(&self, request_id: &str) -> ApprovalResult<Claim<'_>> {
        if !self.in_flight.insert(request_id.to_string()) {
            return Err(ApprovalError::NotPending {
                id: request_id.to_string(),
                status: None,
            });
        }
        Ok(Claim {
            set: &self.in_flight,
            id: request_id.to_string(),
        })
    }

    async fn load(&self, request_id: &str) -> ApprovalResult<PendingRequest> {
        self.read_requests()
            .await?
            .into_iter()
            .find(|r| r.id.as_deref() == Some(request_id))
            .ok_or_else(|| ApprovalError::NotFound(request_id.to_string()))
    }

    async fn read_requests(&self) -> StoreResult<Vec<PendingRequest>> {
        let rows = self.approvals().read().await?;
        let requests = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match PendingRequest::try_from(row) {
                    Ok(request) => Some(request),
                    Err(e) => {
                        tracing::warn!(
                            partition = %self.partition,
                            id = id.as_deref().unwrap_or_default(),
                            error = %e,
                            "skipping malformed approval row"
                        );
                        None
                    }
                }
            })
            .collect();
        Ok(requests)
    }

    /// The one path every mutation reaches the store through
    async fn apply(&self, kind: MutationKind, entity: &str, record: Record) -> StoreResult<Option<Record>> {
        match kind {
            MutationKind::Create => self.store.create(entity, record).await.map(Some),
            MutationKind::Edit => self.store.update(entity, record).await.map(Some),
            MutationKind::Delete => {
                let id = record
                    .id
                    .ok_or_else(|| StoreError::Validation("delete requires a record id".into()))?;
                let plant = record
                    .plant
                    .ok_or_else(|| StoreError::Validation("delete requires a plant".into()))?;
                self.store.delete(entity, &id, &plant).await.map(|_| None)
            }
        }
    }

    async fn replay(&self, request: &PendingRequest) -> StoreResult<()> {
        let mut record = match request.action_type {
            ActionType::Edit => request.target_data.clone(),
            ActionType::Delete => Record::new(),
        };
        record.id = Some(request.target_id.clone());
        record.plant = Some(request.target_plant.clone());

        let kind = MutationKind::from(request.action_type);
        self.apply(kind, &request.target_entity_type, record).await?;
        Ok(())
    }

    /// Persist the applying marker, then replay. A request that already
    /// carries the marker is only replayed if its mutation has not landed.
    async fn apply_approval(
        &self,
        reviewer: &Actor,
        request_id: &str,
        request: &mut PendingRequest,
    ) -> ApprovalResult<()> {
        if request.is_applying() {
            match self.is_applied(request).await {
                Ok(true) => {
                    tracing::info!(
                        request_id = %request_id,
                        applying_by = request.applying_by.as_deref().unwrap_or_default(),
                        "approved mutation already applied, recording verdict only"
                    );
                    return Ok(());
                }
                Ok(false) => {}
                Err(source) => {
                    return Err(ApprovalError::ReplayFailed {
                        request_id: request_id.to_string(),
                        source,
                    });
                }
            }
        } else {
            request.applying_by = Some(reviewer.display_name.clone());
            request.applying_at = Some(Utc::now());
            if let Err(source) = self.write_request(request).await {
                tracing::error!(
                    request_id = %request_id,
                    error = %source,
                    "failed to mark approval as applying"
                );
                return Err(ApprovalError::ResolutionNotRecorded {
                    request_id: request_id.to_string(),
                    applied: false,
                    source,
                });
            }
        }

        if let Err(source) = self.replay(request).await {
            tracing::warn!(
                request_id = %request_id,
                entity = %request.target_entity_type,
                target_id = %request.target_id,
                error = %source,
                "approved request failed to apply"
            );
            request.applying_by = None;
            request.applying_at = None;
            if let Err(e) = self.write_request(request).await {
                tracing::warn!(
                    request_id = %request_id,
                    error = %e,
                    "failed to clear applying marker"
                );
            }
            return Err(ApprovalError::ReplayFailed {
                request_id: request_id.to_string(),
                source,
            });
        }
        Ok(())
    }

    /// Whether the target already reflects the request: a deleted row is
    /// gone, an edited row carries every proposed field
    async fn is_applied(&self, request: &PendingRequest) -> StoreResult<bool> {
        let rows = self
            .store
            .read_plant(&request.target_entity_type, &request.target_plant)
            .await?;
        let target = rows
            .into_iter()
            .find(|r| r.id.as_deref() == Some(request.target_id.as_str()));

        Ok(match (request.action_type, target) {
            (ActionType::Delete, target) => target.is_none(),
            (ActionType::Edit, Some(target)) => request
                .target_data
                .fields
                .iter()
                .all(|(key, value)| target.get(key) == Some(value)),
            (ActionType::Edit, None) => false,
        })
    }

    async fn record_verdict(&self, request_id: &str, request: &PendingRequest) -> StoreResult<()> {
        let mut attempt = 1;
        loop {
            match self.write_request(request).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < VERDICT_WRITE_ATTEMPTS => {
                    tracing::warn!(
                        request_id = %request_id,
                        attempt,
                        error = %e,
                        "verdict write failed, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn write_request(&self, request: &PendingRequest) -> StoreResult<()> {
        self.approvals().update(to_row(request)?).await?;
        Ok(())
    }

    fn deny(&self, actor: &Actor, kind: MutationKind, entity: &str) -> ApprovalError {
        security_log!(
            "WARN",
            "mutation_forbidden",
            role = actor.role.clone(),
            actor = actor.display_name.clone(),
            plant = actor.plant.as_ref().map(Plant::to_string).unwrap_or_default(),
            action = kind.as_str(),
            entity = entity.to_string()
        );
        ApprovalError::Forbidden(format!("role {} cannot {} {}", actor.role, kind, entity))
    }
}

impl std::fmt::Debug for ApprovalEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalEngine")
            .field("store", &self.store)
            .field("evaluator", &self.evaluator)
            .field("partition", &self.partition)
            .finish_non_exhaustive()
    }
}

fn newest_first(mut requests: Vec<PendingRequest>) -> Vec<PendingRequest> {
    requests.sort_by(|a, b| b.requested_at.cmp(&a.requested_at));
    requests
}

fn to_row(request: &PendingRequest) -> StoreResult<Record> {
    request
        .to_record()
        .map_err(|e| StoreError::Validation(format!("approval request is not serializable: {}", e)))
}
