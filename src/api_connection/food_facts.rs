use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::connection::{build_http_client, read_json_response, ApiConnectionError};
use super::endpoints::{
    ExternalNutriments, OpenFoodFactsSearchResponse, OPEN_FOOD_FACTS_BASE_URL,
    OPEN_FOOD_FACTS_SEARCH_PATH,
};

/// Free-text nutrition lookup against some external food database.
///
/// `Ok(None)` means the service answered but knew nothing useful.
#[async_trait]
pub trait FoodFactsLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<Option<ExternalNutriments>, ApiConnectionError>;
}

pub struct OpenFoodFactsClient {
    client: Client,
    base_url: String,
}

impl OpenFoodFactsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiConnectionError> {
        Ok(Self {
            client: build_http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn with_defaults(timeout: Duration) -> Result<Self, ApiConnectionError> {
        Self::new(OPEN_FOOD_FACTS_BASE_URL, timeout)
    }

    pub fn search_url(&self) -> String {
        format!("{}{}", self.base_url, OPEN_FOOD_FACTS_SEARCH_PATH)
    }
}

#[async_trait]
impl FoodFactsLookup for OpenFoodFactsClient {
    async fn lookup(&self, query: &str) -> Result<Option<ExternalNutriments>, ApiConnectionError> {
        let response = self
            .client
            .get(self.search_url())
            .query(&[
                ("search_terms", query),
                ("search_simple", "1"),
                ("action", "process"),
                ("json", "1"),
                ("page_size", "1"),
            ])
            .send()
            .await?;

        let search: OpenFoodFactsSearchResponse = read_json_response(response).await?;
        Ok(search
            .products
            .first()
            .map(ExternalNutriments::from)
            .filter(ExternalNutriments::has_any_value))
    }
}
