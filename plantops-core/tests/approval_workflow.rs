// plantops-core/tests/approval_workflow.rs
// Mutation gating, submission and review against the in-process data service

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{APPROVALS, Harness, actor, downtime, plant};
use plantops_client::WriteOp;
use plantops_core::{ApprovalError, Decision, MutationIntent, MutationOutcome, SubmitRequest};
use shared::models::{ActionType, PendingRequest, Record, RequestStatus};

async fn submit_edit(h: &Harness) -> PendingRequest {
    h.service
        .seed("downtime_NPK1", vec![downtime("r1", "NPK1", "X")]);
    h.engine
        .submit(
            &actor("user", Some("NPK1"), "Operator"),
            SubmitRequest::edit("downtime", downtime("r1", "NPK1", "Y"), "typo in field"),
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_user_edit_is_approved_and_replayed() {
    let h = Harness::new();
    h.service
        .seed("downtime_NPK1", vec![downtime("r1", "NPK1", "X")]);
    let user = actor("user", Some("NPK1"), "Operator");

    // 1. The edit is captured, not applied
    let outcome = h
        .engine
        .execute(
            &user,
            MutationIntent::edit("downtime", downtime("r1", "NPK1", "Y")).with_reason("wrong value"),
        )
        .await
        .unwrap();
    let pending = match outcome {
        MutationOutcome::Pending(p) => p,
        other => panic!("expected pending, got {:?}", other),
    };
    assert_eq!(pending.status, RequestStatus::Pending);
    assert_eq!(pending.action_type, ActionType::Edit);
    assert_eq!(pending.target_id, "r1");
    assert_eq!(pending.target_data.get("field"), Some(&serde_json::json!("Y")));
    assert_eq!(h.business_writes(), 0);
    assert_eq!(
        h.service.records("downtime_NPK1")[0].get("field"),
        Some(&serde_json::json!("X"))
    );

    // 2. Admin approves; the store receives the captured state
    let id = pending.id.clone().unwrap();
    let resolved = h
        .engine
        .decide(&actor("admin", None, "admin"), &id, Decision::Approve, None)
        .await
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Approved);
    assert_eq!(resolved.resolved_by.as_deref(), Some("admin"));
    assert!(resolved.resolved_at.is_some());

    let writes: Vec<_> = h
        .service
        .journal()
        .into_iter()
        .filter(|e| e.partition != APPROVALS)
        .collect();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].partition, "downtime_NPK1");
    assert_eq!(writes[0].op, WriteOp::Update);
    assert_eq!(writes[0].payload, downtime("r1", "NPK1", "Y"));

    // 3. The stored request reflects the verdict
    let stored = h.engine.get(&id).await.unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);
}

#[tokio::test]
async fn test_reject_never_mutates() {
    let h = Harness::new();
    let pending = submit_edit(&h).await;
    let id = pending.id.unwrap();

    let resolved = h
        .engine
        .decide(
            &actor("supervisor", Some("NPK1"), "Shift Lead"),
            &id,
            Decision::Reject,
            Some("  value was right  ".into()),
        )
        .await
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Rejected);
    assert_eq!(resolved.resolution_note.as_deref(), Some("value was right"));
    assert_eq!(h.business_writes(), 0);
    assert_eq!(
        h.service.records("downtime_NPK1")[0].get("field"),
        Some(&serde_json::json!("X"))
    );
}

#[tokio::test]
async fn test_second_decision_is_not_pending() {
    let h = Harness::new();
    let id = submit_edit(&h).await.id.unwrap();
    let admin = actor("admin", None, "admin");

    h.engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap();
    let err = h
        .engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApprovalError::NotPending {
            status: Some(RequestStatus::Approved),
            ..
        }
    ));
    assert!(err.is_validation());
    assert_eq!(h.business_writes(), 1);

    let err = h
        .engine
        .decide(&admin, &id, Decision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::NotPending { .. }));
}

#[tokio::test]
async fn test_racing_reviewers_apply_once() {
    let h = Harness::new();
    let id = submit_edit(&h).await.id.unwrap();
    let admin = actor("admin", None, "admin");
    let avp = actor("avp", None, "AVP");

    let (a, b) = tokio::join!(
        h.engine.decide(&admin, &id, Decision::Approve, None),
        h.engine.decide(&avp, &id, Decision::Approve, None),
    );
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let err = a.err().or(b.err()).unwrap();
    assert!(matches!(err, ApprovalError::NotPending { .. }));
    assert_eq!(h.business_writes(), 1);
}

#[tokio::test]
async fn test_failed_replay_stays_pending_and_can_retry() {
    let h = Harness::new();
    h.service
        .seed("downtime_NPK1", vec![downtime("r1", "NPK1", "X")]);
    let user = actor("user", Some("NPK1"), "Operator");
    let pending = h
        .engine
        .submit(
            &user,
            SubmitRequest::delete("downtime", downtime("r1", "NPK1", "X"), "duplicate entry"),
        )
        .await
        .unwrap();
    let id = pending.id.unwrap();
    let admin = actor("admin", None, "admin");

    h.service.set_unreachable("downtime_NPK1", true);
    let err = h
        .engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::ReplayFailed { .. }));
    assert!(!err.is_validation());
    let stored = h.engine.get(&id).await.unwrap();
    assert!(stored.is_pending());
    assert!(!stored.is_applying());

    h.service.set_unreachable("downtime_NPK1", false);
    let resolved = h
        .engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Approved);
    assert!(h.service.records("downtime_NPK1").is_empty());
}

async fn submit_delete(h: &Harness) -> String {
    h.service
        .seed("downtime_NPK1", vec![downtime("r1", "NPK1", "X")]);
    h.engine
        .submit(
            &actor("user", Some("NPK1"), "Operator"),
            SubmitRequest::delete("downtime", downtime("r1", "NPK1", "X"), "duplicate entry"),
        )
        .await
        .unwrap()
        .id
        .unwrap()
}

#[tokio::test]
async fn test_lost_delete_verdict_is_finished_without_replay() {
    let h = Harness::new();
    let id = submit_delete(&h).await;
    let admin = actor("admin", None, "admin");

    // Marker write goes through, every verdict write is lost
    h.service.fail_writes(APPROVALS, 1, 3);
    let err = h
        .engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApprovalError::ResolutionNotRecorded { applied: true, .. }
    ));
    assert!(h.service.records("downtime_NPK1").is_empty());
    let stored = h.engine.get(&id).await.unwrap();
    assert!(stored.is_applying());
    assert_eq!(stored.applying_by.as_deref(), Some("admin"));

    // A retry records the verdict instead of deleting again
    let resolved = h
        .engine
        .decide(&admin, &id, Decision::Approve, Some("retry".into()))
        .await
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Approved);
    assert_eq!(h.business_writes(), 1);
    assert_eq!(h.engine.get(&id).await.unwrap().status, RequestStatus::Approved);
}

#[tokio::test]
async fn test_lost_edit_verdict_is_not_replayed_and_cannot_be_rejected() {
    let h = Harness::new();
    let id = submit_edit(&h).await.id.unwrap();
    let admin = actor("admin", None, "admin");

    h.service.fail_writes(APPROVALS, 1, 3);
    let err = h
        .engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApprovalError::ResolutionNotRecorded { applied: true, .. }
    ));

    // The edit already landed, so rejecting it now would lie
    let err = h
        .engine
        .decide(&actor("supervisor", Some("NPK1"), "Shift Lead"), &id, Decision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::NotPending { status: None, .. }));

    h.engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap();
    let updates = h
        .service
        .journal()
        .into_iter()
        .filter(|e| e.partition == "downtime_NPK1" && e.op == WriteOp::Update)
        .count();
    assert_eq!(updates, 1);
}

#[tokio::test]
async fn test_verdict_write_is_retried() {
    let h = Harness::new();
    let id = submit_delete(&h).await;

    // One lost verdict write is absorbed by the retry
    h.service.fail_writes(APPROVALS, 1, 1);
    let resolved = h
        .engine
        .decide(&actor("admin", None, "admin"), &id, Decision::Approve, None)
        .await
        .unwrap();
    assert_eq!(resolved.status, RequestStatus::Approved);
    assert_eq!(h.business_writes(), 1);
    assert_eq!(h.engine.get(&id).await.unwrap().status, RequestStatus::Approved);
}

#[tokio::test]
async fn test_unmarked_approval_applies_nothing() {
    let h = Harness::new();
    let id = submit_delete(&h).await;
    let admin = actor("admin", None, "admin");

    // The first approval write is the marker; losing it stops the replay
    h.service.fail_writes(APPROVALS, 0, 1);
    let err = h
        .engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ApprovalError::ResolutionNotRecorded { applied: false, .. }
    ));
    assert_eq!(h.business_writes(), 0);
    assert_eq!(h.service.records("downtime_NPK1").len(), 1);

    h.engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap();
    assert_eq!(h.business_writes(), 1);
    assert!(h.service.records("downtime_NPK1").is_empty());
}

#[tokio::test]
async fn test_stale_marker_still_replays_unapplied_edit() {
    let h = Harness::new();
    let id = submit_edit(&h).await.id.unwrap();
    let admin = actor("admin", None, "admin");

    // Replay fails and the marker cannot be cleared
    h.service.set_unreachable("downtime_NPK1", true);
    h.service.fail_writes(APPROVALS, 1, 1);
    let err = h
        .engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::ReplayFailed { .. }));
    assert!(h.engine.get(&id).await.unwrap().is_applying());

    h.service.set_unreachable("downtime_NPK1", false);
    h.engine
        .decide(&admin, &id, Decision::Approve, None)
        .await
        .unwrap();
    assert_eq!(
        h.service.records("downtime_NPK1")[0].get("field"),
        Some(&serde_json::json!("Y"))
    );
    assert_eq!(h.business_writes(), 2);
}

#[tokio::test]
async fn test_submit_preconditions() {
    let h = Harness::new();
    let target = downtime("r1", "NPK1", "Y");

    let err = h
        .engine
        .submit(
            &actor("admin", None, "admin"),
            SubmitRequest::edit("downtime", target.clone(), "why"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::ApprovalNotRequired { .. }));
    assert!(err.is_validation());

    let err = h
        .engine
        .submit(
            &actor("manager", Some("NPK1"), "Manager"),
            SubmitRequest::edit("downtime", target.clone(), "why"),
        )
        .await
        .unwrap_err();
    assert!(err.is_forbidden());

    let user = actor("user", Some("NPK1"), "Operator");
    let err = h
        .engine
        .submit(&user, SubmitRequest::edit("downtime", target.clone(), "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::ReasonRequired));

    let err = h
        .engine
        .submit(
            &user,
            SubmitRequest::delete("downtime", Record::new().with_plant("NPK1"), "why"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::InvalidTarget(_)));

    let err = h
        .engine
        .submit(
            &user,
            SubmitRequest::delete("downtime", downtime("r1", "NPK5", "Y"), "why"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::InvalidTarget(_)));

    assert!(h.service.journal().is_empty());
}

#[tokio::test]
async fn test_unrecorded_submission() {
    let h = Harness::new();
    h.service.set_unreachable(APPROVALS, true);
    let err = h
        .engine
        .submit(
            &actor("user", Some("NPK1"), "Operator"),
            SubmitRequest::edit("downtime", downtime("r1", "NPK1", "Y"), "fix"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::NotRecorded(_)));
}

#[tokio::test]
async fn test_reviewer_needs_direct_capability() {
    let h = Harness::new();
    let id = submit_edit(&h).await.id.unwrap();

    for reviewer in [
        actor("user", Some("NPK1"), "Peer"),
        actor("manager", None, "Manager"),
        actor("auditor", None, "Auditor"),
    ] {
        let err = h
            .engine
            .decide(&reviewer, &id, Decision::Approve, None)
            .await
            .unwrap_err();
        assert!(err.is_forbidden(), "{} should not review", reviewer.role);
    }
    assert!(h.engine.get(&id).await.unwrap().is_pending());
    assert_eq!(h.business_writes(), 0);
}

#[tokio::test]
async fn test_unknown_request() {
    let h = Harness::new();
    let err = h
        .engine
        .decide(&actor("admin", None, "admin"), "missing", Decision::Reject, None)
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::NotFound(id) if id == "missing"));
}

#[tokio::test]
async fn test_list_newest_first_with_filter() {
    let h = Harness::new();
    let base = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
    let request = |id: &str, minutes: i64, status: RequestStatus| PendingRequest {
        id: Some(id.to_string()),
        action_type: ActionType::Edit,
        target_entity_type: "downtime".into(),
        target_id: "r1".into(),
        target_plant: plant("NPK1"),
        target_data: downtime("r1", "NPK1", "Y"),
        reason: "fix".into(),
        requested_by: "Operator".into(),
        requested_by_role: "user".into(),
        requested_by_plant: Some(plant("NPK1")),
        status,
        requested_at: base + Duration::minutes(minutes),
        resolved_at: None,
        resolved_by: None,
        resolution_note: None,
        applying_by: None,
        applying_at: None,
    };
    let rows = vec![
        request("old", 0, RequestStatus::Pending).to_record().unwrap(),
        request("mid", 5, RequestStatus::Rejected).to_record().unwrap(),
        Record::new().with_id("junk").with_field("status", "pending"),
        request("new", 10, RequestStatus::Pending).to_record().unwrap(),
    ];
    h.service.seed(APPROVALS, rows);

    let ids = |requests: Vec<PendingRequest>| -> Vec<String> {
        requests.into_iter().filter_map(|r| r.id).collect()
    };

    // No filter means the review queue
    assert_eq!(ids(h.engine.list(None).await.unwrap()), vec!["new", "old"]);
    assert_eq!(
        ids(h.engine.list(Some(RequestStatus::Pending)).await.unwrap()),
        vec!["new", "old"]
    );
    assert_eq!(
        ids(h.engine.list(Some(RequestStatus::Rejected)).await.unwrap()),
        vec!["mid"]
    );
    assert_eq!(ids(h.engine.list_all().await.unwrap()), vec!["new", "mid", "old"]);
    assert!(h.service.journal().is_empty());
}

#[tokio::test]
async fn test_execute_direct_and_forbidden_paths() {
    let h = Harness::new();

    // Creates are never gated for users
    let outcome = h
        .engine
        .execute(
            &actor("user", Some("NPK2"), "Operator"),
            MutationIntent::create("downtime", Record::new().with_plant("NPK2").with_field("hours", 1)),
        )
        .await
        .unwrap();
    assert!(outcome.is_applied());
    assert_eq!(h.service.records("downtime").len(), 1);

    let err = h
        .engine
        .execute(
            &actor("eksternal", None, "Vendor"),
            MutationIntent::create("downtime", Record::new().with_plant("NPK2")),
        )
        .await
        .unwrap_err();
    assert!(err.is_forbidden());
    assert_eq!(h.service.journal().len(), 1);

    // Direct delete by a supervisor
    h.service
        .seed("downtime_NPK1", vec![downtime("r9", "NPK1", "X")]);
    let outcome = h
        .engine
        .execute(
            &actor("supervisor", Some("NPK1"), "Shift Lead"),
            MutationIntent::delete("downtime", downtime("r9", "NPK1", "X")),
        )
        .await
        .unwrap();
    assert_eq!(outcome, MutationOutcome::Applied(None));
    assert!(h.service.records("downtime_NPK1").is_empty());
}

#[tokio::test]
async fn test_gated_execute_without_reason() {
    let h = Harness::new();
    let err = h
        .engine
        .execute(
            &actor("user", Some("NPK1"), "Operator"),
            MutationIntent::delete("downtime", downtime("r1", "NPK1", "X")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApprovalError::ReasonRequired));
    assert!(h.service.journal().is_empty());
}
