//! Environment configuration

use plantops_client::ClientConfig;
use shared::models::Plant;

use crate::approval::DEFAULT_APPROVAL_PARTITION;
use crate::auth::{PagePlantPolicy, PermissionEvaluator};
use crate::store::PlantRegistry;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_service_url: String,
    pub data_service_token: Option<String>,
    pub request_timeout_ms: u64,

    /// Plant whose partitions use the bare entity name
    pub base_plant: Plant,
    pub plants: Vec<Plant>,
    pub approval_partition: String,
    /// `None` leaves page visibility to the role table
    pub page_plants: Option<Vec<Plant>>,

    pub log_level: String,
    pub log_dir: Option<String>,
    pub environment: String,
}

impl Config {
    /// Load `.env` if present, then read the environment
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            data_service_url: var("DATA_SERVICE_URL")
                .unwrap_or_else(|| "http://localhost:8080/data".into()),
            data_service_token: var("DATA_SERVICE_TOKEN"),
            request_timeout_ms: var("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(30000),
            base_plant: var("BASE_PLANT").map(Plant::new).unwrap_or_else(|| Plant::from("NPK2")),
            plants: var("PLANTS")
                .map(|v| parse_plants(&v))
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| vec![Plant::from("NPK1"), Plant::from("NPK2")]),
            approval_partition: var("APPROVAL_PARTITION")
                .unwrap_or_else(|| DEFAULT_APPROVAL_PARTITION.into()),
            page_plants: var("PAGE_PLANTS").map(|v| parse_plants(&v)),
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_dir: var("LOG_DIR"),
            environment: var("ENVIRONMENT").unwrap_or_else(|| "development".into()),
        }
    }

    pub fn plant_registry(&self) -> PlantRegistry {
        PlantRegistry::new(self.base_plant.clone(), self.plants.iter().cloned())
    }

    pub fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(&self.data_service_url).with_timeout_ms(self.request_timeout_ms);
        match &self.data_service_token {
            Some(token) => config.with_token(token),
            None => config,
        }
    }

    pub fn evaluator(&self) -> PermissionEvaluator {
        match &self.page_plants {
            Some(plants) => {
                PermissionEvaluator::new().with_page_policy(PagePlantPolicy::new(plants.iter().cloned()))
            }
            None => PermissionEvaluator::new(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_plants(value: &str) -> Vec<Plant> {
    value
        .split(',')
        .map(Plant::new)
        .filter(|p| !p.as_str().is_empty())
        .collect()
}
