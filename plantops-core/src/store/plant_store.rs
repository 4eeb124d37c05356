//! Plant-routed record store
//!
//! Reads fan out to every plant partition and come back merged and tagged.
//! Writes go to exactly one partition, chosen by the record's plant tag.

use std::sync::Arc;

use futures::future::join_all;
use plantops_client::{ClientError, DataService, WriteOp};
use shared::models::{Plant, Record};

use super::sort::{SortSpec, sort_records};
use super::{PartitionRouter, PlantRegistry, StoreError, StoreResult};

/// Unrouted handle onto one physical partition
#[derive(Clone)]
pub struct Partition {
    service: Arc<dyn DataService>,
    key: String,
}

impl Partition {
    pub fn new(service: Arc<dyn DataService>, key: impl Into<String>) -> Self {
        Self {
            service,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn read(&self) -> StoreResult<Vec<Record>> {
        let response = self.service.read(&self.key).await?;
        let rows = response.into_result().map_err(StoreError::Rejected)?;
        Ok(rows.unwrap_or_default())
    }

    /// Insert a row; the result carries the store-assigned id
    pub async fn create(&self, record: Record) -> StoreResult<Record> {
        let stored = self.write(WriteOp::Create, &record).await?.ok_or_else(|| {
            ClientError::InvalidResponse(format!("create on {} returned no record", self.key))
        })?;

        let mut merged = record;
        merged.merge(stored);
        if merged.id.is_none() {
            return Err(StoreError::Transport(ClientError::InvalidResponse(format!(
                "create on {} returned no id",
                self.key
            ))));
        }
        Ok(merged)
    }

    pub async fn update(&self, record: Record) -> StoreResult<Record> {
        if record.id.is_none() {
            return Err(StoreError::Validation("update requires a record id".into()));
        }
        let stored = self.write(WriteOp::Update, &record).await?;
        let mut merged = record;
        if let Some(stored) = stored {
            merged.merge(stored);
        }
        Ok(merged)
    }

    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        self.write(WriteOp::Delete, &Record::new().with_id(id)).await?;
        Ok(())
    }

    async fn write(&self, op: WriteOp, payload: &Record) -> StoreResult<Option<Record>> {
        let response = self.service.write(&self.key, op, payload).await?;
        response.into_result().map_err(StoreError::Rejected)
    }
}

impl std::fmt::Debug for Partition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Partition").field("key", &self.key).finish()
    }
}

/// Entity-level access across all plant partitions
#[derive(Clone)]
pub struct PlantStore {
    service: Arc<dyn DataService>,
    router: PartitionRouter,
}

impl PlantStore {
    pub fn new(service: Arc<dyn DataService>, registry: PlantRegistry) -> Self {
        Self {
            service,
            router: PartitionRouter::new(registry),
        }
    }

    pub fn router(&self) -> &PartitionRouter {
        &self.router
    }

    pub fn registry(&self) -> &PlantRegistry {
        self.router.registry()
    }

    pub fn route(&self, entity: &str, plant: &Plant) -> StoreResult<String> {
        self.router.route(entity, plant)
    }

    pub fn partition(&self, key: impl Into<String>) -> Partition {
        Partition::new(self.service.clone(), key)
    }

    /// Read every plant partition concurrently and concatenate in registry
    /// order. A failed partition contributes nothing.
    pub async fn read_all(&self, entity: &str) -> Vec<Record> {
        let partitions = self.router.partitions(entity);
        let reads = partitions.iter().map(|(_, key)| {
            let partition = self.partition(key.as_str());
            async move { partition.read().await }
        });
        let results = join_all(reads).await;

        let mut merged = Vec::new();
        for ((plant, key), result) in partitions.into_iter().zip(results) {
            match result {
                Ok(rows) => {
                    tracing::debug!(partition = %key, rows = rows.len(), "partition read");
                    merged.extend(tag(rows, &plant));
                }
                Err(e) => {
                    tracing::warn!(
                        entity = %entity,
                        plant = %plant,
                        partition = %key,
                        error = %e,
                        "partition read failed, skipping"
                    );
                }
            }
        }
        merged
    }

    /// Read one plant's partition, surfacing failures
    pub async fn read_plant(&self, entity: &str, plant: &Plant) -> StoreResult<Vec<Record>> {
        let key = self.route(entity, plant)?;
        let rows = self.partition(key).read().await?;
        Ok(tag(rows, plant).collect())
    }

    /// Merged view ordered by one field
    pub async fn read_sorted(&self, entity: &str, spec: &SortSpec) -> Vec<Record> {
        let mut records = self.read_all(entity).await;
        sort_records(&mut records, spec);
        records
    }

    pub async fn create(&self, entity: &str, record: Record) -> StoreResult<Record> {
        let plant = record
            .plant
            .clone()
            .ok_or_else(|| StoreError::Validation("create requires a plant".into()))?;
        let key = self.route(entity, &plant)?;

        let mut created = self.partition(key.as_str()).create(record).await?;
        created.plant = Some(plant);
        tracing::info!(
            entity = %entity,
            partition = %key,
            id = created.id.as_deref().unwrap_or_default(),
            "record created"
        );
        Ok(created)
    }

    /// Update in place. Routed by the record's own plant tag; records never
    /// move between partitions.
    pub async fn update(&self, entity: &str, record: Record) -> StoreResult<Record> {
        let id = record
            .id
            .clone()
            .ok_or_else(|| StoreError::Validation("update requires a record id".into()))?;
        let plant = record
            .plant
            .clone()
            .ok_or_else(|| StoreError::Validation("update requires a plant".into()))?;
        let key = self.route(entity, &plant)?;

        let mut updated = self.partition(key.as_str()).update(record).await?;
        updated.plant = Some(plant);
        tracing::info!(entity = %entity, partition = %key, id = %id, "record updated");
        Ok(updated)
    }

    pub async fn delete(&self, entity: &str, id: &str, plant: &Plant) -> StoreResult<()> {
        if id.trim().is_empty() {
            return Err(StoreError::Validation("delete requires a record id".into()));
        }
        let key = self.route(entity, plant)?;

        self.partition(key.as_str()).delete(id).await?;
        tracing::info!(entity = %entity, partition = %key, id = %id, "record deleted");
        Ok(())
    }
}

impl std::fmt::Debug for PlantStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlantStore")
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}

/// Overwrite each row's plant tag with its source partition's plant
fn tag(rows: Vec<Record>, plant: &Plant) -> impl Iterator<Item = Record> + '_ {
    rows.into_iter().map(move |mut row| {
        row.plant = Some(plant.clone());
        row
    })
}
