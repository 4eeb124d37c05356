//! Partition routing
//!
//! One logical entity lives in one physical partition per plant. The base
//! plant keeps the bare entity name; every other plant appends `_<TAG>`.

use shared::models::Plant;

use super::{StoreError, StoreResult};

/// The closed set of plants for one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantRegistry {
    base: Plant,
    /// Registry order, base included
    plants: Vec<Plant>,
}

impl PlantRegistry {
    /// Build a registry. Duplicates are dropped and the base plant is added
    /// at the end when the list does not name it.
    pub fn new(base: impl Into<Plant>, plants: impl IntoIterator<Item = Plant>) -> Self {
        let base = base.into();
        let mut ordered: Vec<Plant> = Vec::new();
        for plant in plants {
            if !plant.as_str().is_empty() && !ordered.contains(&plant) {
                ordered.push(plant);
            }
        }
        if !ordered.contains(&base) {
            ordered.push(base.clone());
        }
        Self {
            base,
            plants: ordered,
        }
    }

    pub fn base(&self) -> &Plant {
        &self.base
    }

    pub fn plants(&self) -> &[Plant] {
        &self.plants
    }

    pub fn contains(&self, plant: &Plant) -> bool {
        self.plants.contains(plant)
    }
}

impl Default for PlantRegistry {
    fn default() -> Self {
        Self::new("NPK2", [Plant::from("NPK1"), Plant::from("NPK2")])
    }
}

/// Maps (entity, plant) to a partition key
#[derive(Debug, Clone, Default)]
pub struct PartitionRouter {
    registry: PlantRegistry,
}

impl PartitionRouter {
    pub fn new(registry: PlantRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &PlantRegistry {
        &self.registry
    }

    pub fn route(&self, entity: &str, plant: &Plant) -> StoreResult<String> {
        if !self.registry.contains(plant) {
            return Err(StoreError::UnknownPlant(plant.clone()));
        }
        Ok(self.key(entity, plant))
    }

    /// Every partition of an entity, in registry order
    pub fn partitions(&self, entity: &str) -> Vec<(Plant, String)> {
        self.registry
            .plants()
            .iter()
            .map(|plant| (plant.clone(), self.key(entity, plant)))
            .collect()
    }

    fn key(&self, entity: &str, plant: &Plant) -> String {
        if plant == self.registry.base() {
            entity.to_string()
        } else {
            format!("{}_{}", entity, plant)
        }
    }
}
