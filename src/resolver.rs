use std::sync::Arc;
use std::time::Duration;

use crate::api_connection::connection::with_timeout;
use crate::api_connection::endpoints::ExternalNutriments;
use crate::api_connection::{ApiConnectionError, FoodFactsLookup};
use crate::catalog::NutritionCatalog;
use crate::models::{
    round1, FactsSource, NutritionFacts, DEFAULT_CARBS_PER_100G, DEFAULT_FAT_PER_100G,
    DEFAULT_KCAL_PER_100G, DEFAULT_PROTEIN_PER_100G,
};

pub const DEFAULT_LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Maps a food label to nutrition facts: catalog first, then the external
/// lookup, then generic defaults. `resolve` always produces an answer.
#[derive(Clone)]
pub struct NutritionResolver {
    catalog: Arc<NutritionCatalog>,
    external: Option<Arc<dyn FoodFactsLookup>>,
    lookup_timeout: Duration,
}

impl NutritionResolver {
    pub fn new(catalog: Arc<NutritionCatalog>) -> Self {
        Self {
            catalog,
            external: None,
            lookup_timeout: DEFAULT_LOOKUP_TIMEOUT,
        }
    }

    pub fn with_external_lookup(mut self, lookup: Arc<dyn FoodFactsLookup>) -> Self {
        self.external = Some(lookup);
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub async fn resolve(&self, key: &str) -> NutritionFacts {
        if let Some(facts) = self.catalog.lookup_exact(key) {
            return facts;
        }

        let query = key.trim();
        if query.is_empty() {
            return NutritionFacts::fallback(key);
        }

        if let Some(lookup) = &self.external {
            match with_timeout(self.lookup_timeout, lookup.lookup(query)).await {
                Ok(Some(nutriments)) => {
                    log::debug!(
                        "External lookup matched '{}' to {:?}",
                        query, nutriments.product_name
                    );
                    return facts_from_external(key, &nutriments);
                }
                Ok(None) => log::debug!("External lookup has no result for '{}'", query),
                Err(ApiConnectionError::Timeout(limit)) => {
                    log::warn!("External lookup for '{}' timed out after {:?}", query, limit)
                }
                Err(e) => log::warn!("External lookup for '{}' failed: {}", query, e),
            }
        }

        NutritionFacts::fallback(key)
    }
}

/// Each missing field falls back to its own default; values are rounded to
/// one decimal.
pub fn facts_from_external(key: &str, nutriments: &ExternalNutriments) -> NutritionFacts {
    NutritionFacts {
        display_name: key.to_string(),
        kcal_per_100g: round1(nutriments.energy_kcal_100g.unwrap_or(DEFAULT_KCAL_PER_100G)),
        protein_g_per_100g: round1(nutriments.proteins_100g.unwrap_or(DEFAULT_PROTEIN_PER_100G)),
        fat_g_per_100g: round1(nutriments.fat_100g.unwrap_or(DEFAULT_FAT_PER_100G)),
        carbohydrate_g_per_100g: round1(
            nutriments.carbohydrates_100g.unwrap_or(DEFAULT_CARBS_PER_100G),
        ),
        source: FactsSource::ExternalLookup,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticLookup(Option<ExternalNutriments>);

    #[async_trait]
    impl FoodFactsLookup for StaticLookup {
        async fn lookup(&self, _query: &str) -> Result<Option<ExternalNutriments>, ApiConnectionError> {
            Ok(self.0.clone())
        }
    }

    struct FailingLookup;

    #[async_trait]
    impl FoodFactsLookup for FailingLookup {
        async fn lookup(&self, _query: &str) -> Result<Option<ExternalNutriments>, ApiConnectionError> {
            Err(ApiConnectionError::ApiError {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                error_body: "down".to_string(),
            })
        }
    }

    struct SlowLookup;

    #[async_trait]
    impl FoodFactsLookup for SlowLookup {
        async fn lookup(&self, _query: &str) -> Result<Option<ExternalNutriments>, ApiConnectionError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(Some(ExternalNutriments {
                energy_kcal_100g: Some(1.0),
                ..Default::default()
            }))
        }
    }

    #[derive(Default)]
    struct CountingLookup {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl FoodFactsLookup for CountingLookup {
        async fn lookup(&self, _query: &str) -> Result<Option<ExternalNutriments>, ApiConnectionError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(None)
        }
    }

    fn resolver() -> NutritionResolver {
        NutritionResolver::new(Arc::new(NutritionCatalog::builtin()))
    }

    #[tokio::test]
    async fn test_catalog_hit_skips_external_lookup() {
        let counting = Arc::new(CountingLookup::default());
        let resolver = resolver().with_external_lookup(counting.clone());
        let facts = resolver.resolve("apple").await;
        assert_eq!(facts.source, FactsSource::Catalog);
        assert_eq!(facts.kcal_per_100g, 52.0);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_external_lookup_fills_missing_fields_independently() {
        let lookup = StaticLookup(Some(ExternalNutriments {
            product_name: Some("Durian".to_string()),
            energy_kcal_100g: Some(147.04),
            proteins_100g: None,
            fat_100g: Some(5.33),
            carbohydrates_100g: None,
        }));
        let facts = resolver().with_external_lookup(Arc::new(lookup)).resolve("durian").await;
        assert_eq!(facts.source, FactsSource::ExternalLookup);
        assert_eq!(facts.display_name, "durian");
        assert_eq!(facts.kcal_per_100g, 147.0);
        assert_eq!(facts.protein_g_per_100g, 10.0);
        assert_eq!(facts.fat_g_per_100g, 5.3);
        assert_eq!(facts.carbohydrate_g_per_100g, 20.0);
    }

    #[tokio::test]
    async fn test_unknown_label_without_external_match_is_default() {
        let facts = resolver()
            .with_external_lookup(Arc::new(StaticLookup(None)))
            .resolve("durian")
            .await;
        assert_eq!(facts, NutritionFacts::fallback("durian"));
    }

    #[tokio::test]
    async fn test_external_failure_degrades_to_default() {
        let facts = resolver().with_external_lookup(Arc::new(FailingLookup)).resolve("durian").await;
        assert_eq!(facts.source, FactsSource::Default);
        assert_eq!(facts.kcal_per_100g, 200.0);
    }

    #[tokio::test]
    async fn test_slow_external_lookup_times_out_to_default() {
        let facts = resolver()
            .with_external_lookup(Arc::new(SlowLookup))
            .with_lookup_timeout(Duration::from_millis(30))
            .resolve("durian")
            .await;
        assert_eq!(facts.source, FactsSource::Default);
    }

    #[tokio::test]
    async fn test_blank_key_never_calls_external() {
        let counting = Arc::new(CountingLookup::default());
        let resolver = resolver().with_external_lookup(counting.clone());
        let facts = resolver.resolve("   ").await;
        assert_eq!(facts.source, FactsSource::Default);
        assert_eq!(counting.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolve_is_total_for_odd_keys() {
        let resolver = resolver();
        let long_key = "x".repeat(1000);
        for key in ["", "🍣", "ДУРИАН", "a\tb\nc", long_key.as_str()] {
            let facts = resolver.resolve(key).await;
            assert!(facts.kcal_per_100g >= 0.0);
            assert!(facts.protein_g_per_100g >= 0.0);
            assert!(facts.fat_g_per_100g >= 0.0);
            assert!(facts.carbohydrate_g_per_100g >= 0.0);
        }
    }
}
