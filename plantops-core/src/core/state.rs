//! Assembled core services

use std::sync::Arc;

use plantops_client::{ClientResult, DataService};

use crate::approval::ApprovalEngine;
use crate::core::Config;
use crate::store::PlantStore;

/// Core state - shared handles to every service
///
/// Cloning is cheap; all services sit behind `Arc`.
///
/// | Field | Type | Purpose |
/// |-------|------|---------|
/// | config | Config | Loaded configuration (immutable) |
/// | engine | Arc<ApprovalEngine> | Mutation gating and approval queue |
#[derive(Clone, Debug)]
pub struct CoreState {
    pub config: Config,
    pub engine: Arc<ApprovalEngine>,
}

impl CoreState {
    /// Wire the services against the HTTP data service from `config`
    pub fn initialize(config: Config) -> ClientResult<Self> {
        let service = config.client_config().build_http_service()?;
        tracing::info!(
            endpoint = %service.endpoint(),
            plants = ?config.plants,
            base = %config.base_plant,
            "data service configured"
        );
        Ok(Self::with_service(config, Arc::new(service)))
    }

    /// Wire the services against any data service
    pub fn with_service(config: Config, service: Arc<dyn DataService>) -> Self {
        let store = PlantStore::new(service, config.plant_registry());
        let engine = ApprovalEngine::with_partition(
            store,
            config.evaluator(),
            config.approval_partition.clone(),
        );
        Self {
            config,
            engine: Arc::new(engine),
        }
    }

    pub fn engine(&self) -> &ApprovalEngine {
        &self.engine
    }

    pub fn store(&self) -> &PlantStore {
        self.engine.store()
    }
}
