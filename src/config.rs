use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::api_connection::endpoints::{
    OPEN_FOOD_FACTS_BASE_URL, ROBOFLOW_DEFAULT_WORKFLOW_ID, ROBOFLOW_DEFAULT_WORKSPACE,
    ROBOFLOW_WORKFLOW_BASE_URL,
};
use crate::normalizer::{DEFAULT_CONFIDENCE_THRESHOLD_PERCENT, DEFAULT_MAX_RESULTS};

pub const ROBOFLOW_API_KEY_ENV_VAR: &str = "ROBOFLOW_API_KEY";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub roboflow_api_key: Option<String>,
    pub roboflow_workspace: String,
    pub roboflow_workflow_id: String,
    pub roboflow_workflow_base_url: String,
    pub open_food_facts_url: String,
    pub confidence_threshold_percent: f32,
    pub max_detections: usize,
    pub food_facts_timeout: Duration,
    pub recognition_timeout: Duration,
    pub catalog_csv: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            roboflow_api_key: None,
            roboflow_workspace: ROBOFLOW_DEFAULT_WORKSPACE.to_string(),
            roboflow_workflow_id: ROBOFLOW_DEFAULT_WORKFLOW_ID.to_string(),
            roboflow_workflow_base_url: ROBOFLOW_WORKFLOW_BASE_URL.to_string(),
            open_food_facts_url: OPEN_FOOD_FACTS_BASE_URL.to_string(),
            confidence_threshold_percent: DEFAULT_CONFIDENCE_THRESHOLD_PERCENT,
            max_detections: DEFAULT_MAX_RESULTS,
            food_facts_timeout: Duration::from_secs(5),
            recognition_timeout: Duration::from_secs(30),
            catalog_csv: None,
        }
    }
}

impl AppConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any variable source; unset or blank variables
    /// keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let config = Self {
            roboflow_api_key: get(ROBOFLOW_API_KEY_ENV_VAR),
            roboflow_workspace: get("ROBOFLOW_WORKSPACE").unwrap_or(defaults.roboflow_workspace),
            roboflow_workflow_id: get("ROBOFLOW_WORKFLOW_ID").unwrap_or(defaults.roboflow_workflow_id),
            roboflow_workflow_base_url: get("ROBOFLOW_WORKFLOW_BASE_URL")
                .unwrap_or(defaults.roboflow_workflow_base_url),
            open_food_facts_url: get("OPEN_FOOD_FACTS_URL").unwrap_or(defaults.open_food_facts_url),
            confidence_threshold_percent: parse_var(&get, "CONFIDENCE_THRESHOLD")?
                .unwrap_or(defaults.confidence_threshold_percent),
            max_detections: parse_var(&get, "MAX_DETECTIONS")?.unwrap_or(defaults.max_detections),
            food_facts_timeout: parse_var(&get, "FOOD_FACTS_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.food_facts_timeout),
            recognition_timeout: parse_var(&get, "RECOGNITION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.recognition_timeout),
            catalog_csv: get("FOOD_CATALOG_CSV").map(PathBuf::from),
        };

        if !(0.0..100.0).contains(&config.confidence_threshold_percent) {
            return Err(anyhow::anyhow!(
                "CONFIDENCE_THRESHOLD must be in [0, 100), got {}",
                config.confidence_threshold_percent
            ));
        }
        if config.food_facts_timeout.is_zero() || config.recognition_timeout.is_zero() {
            return Err(anyhow::anyhow!("Timeouts must be at least one second"));
        }

        Ok(config)
    }
}

fn parse_var<T, G>(get: &G, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Invalid value '{}' for {}", raw, name))
        })
        .transpose()
}
