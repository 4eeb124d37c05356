//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use plantops_client::MemoryDataService;
use plantops_core::{ApprovalEngine, PermissionEvaluator, PlantRegistry, PlantStore};
use shared::models::{Actor, Plant, Record};

pub const APPROVALS: &str = "approval_requests";

pub struct Harness {
    pub service: Arc<MemoryDataService>,
    pub engine: ApprovalEngine,
}

impl Harness {
    pub fn new() -> Self {
        let service = Arc::new(MemoryDataService::new());
        let store = PlantStore::new(service.clone(), PlantRegistry::default());
        let engine = ApprovalEngine::with_partition(store, PermissionEvaluator::new(), APPROVALS);
        Self { service, engine }
    }

    pub fn store(&self) -> &PlantStore {
        self.engine.store()
    }

    /// Write calls that reached any business partition
    pub fn business_writes(&self) -> usize {
        self.service
            .journal()
            .iter()
            .filter(|e| e.partition != APPROVALS)
            .count()
    }
}

pub fn plant(tag: &str) -> Plant {
    Plant::from(tag)
}

pub fn actor(role: &str, plant_tag: Option<&str>, name: &str) -> Actor {
    Actor::new(role, plant_tag.map(Plant::from), name)
}

pub fn downtime(id: &str, plant_tag: &str, field: &str) -> Record {
    Record::new()
        .with_id(id)
        .with_plant(plant_tag)
        .with_field("field", field)
}
