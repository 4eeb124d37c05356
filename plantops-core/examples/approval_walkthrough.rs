//! Approval Walkthrough - gated edit from submission to replay
//!
//! Runs against the in-process data service, no backend required.
//!
//! Run: cargo run -p plantops-core --example approval_walkthrough

use std::sync::Arc;

use plantops_client::MemoryDataService;
use plantops_core::{Config, CoreState, Decision, MutationIntent, MutationOutcome, init_logger};
use shared::models::{Actor, Plant, Record};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();

    let config = Config::load();
    let service = Arc::new(MemoryDataService::new());
    service.seed(
        "downtime_NPK1",
        vec![
            Record::new()
                .with_id("r1")
                .with_plant("NPK1")
                .with_field("date", "2024-06-01")
                .with_field("field", "X"),
        ],
    );
    let state = CoreState::with_service(config, service.clone());
    let engine = state.engine();

    let operator = Actor::new("user", Some(Plant::from("NPK1")), "Operator");
    let admin = Actor::new("admin", None, "admin");

    // A user's edit is captured for review
    let edited = Record::new()
        .with_id("r1")
        .with_plant("NPK1")
        .with_field("date", "2024-06-01")
        .with_field("field", "Y");
    let outcome = engine
        .execute(
            &operator,
            MutationIntent::edit("downtime", edited).with_reason("wrong reading"),
        )
        .await?;
    let MutationOutcome::Pending(request) = outcome else {
        anyhow::bail!("edit by a user should need approval");
    };
    let request_id = request
        .id
        .clone()
        .ok_or_else(|| anyhow::anyhow!("request was stored without an id"))?;
    println!("submitted {} ({})", request_id, request.status);

    for pending in engine.list(None).await? {
        println!(
            "  {} {} {}#{} by {}",
            pending.requested_at, pending.action_type, pending.target_entity_type, pending.target_id,
            pending.requested_by
        );
    }

    // An admin approves; the edit is replayed against downtime_NPK1
    let resolved = engine
        .decide(&admin, &request_id, Decision::Approve, Some("checked log".into()))
        .await?;
    println!(
        "{} by {}",
        resolved.status,
        resolved.resolved_by.as_deref().unwrap_or("-")
    );

    for record in state.store().read_all("downtime").await {
        println!("  {}", serde_json::to_string(&record)?);
    }

    // Deciding again is refused
    if let Err(e) = engine.decide(&admin, &request_id, Decision::Approve, None).await {
        println!("second decision: {}", e);
    }
    Ok(())
}
