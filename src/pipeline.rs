use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api_connection::{OpenFoodFactsClient, RecognitionClient};
use crate::catalog::NutritionCatalog;
use crate::config::AppConfig;
use crate::models::{NutritionFacts, RawDetection, Report};
use crate::normalizer::DetectionNormalizer;
use crate::report_aggregator::ReportAggregator;
use crate::resolver::NutritionResolver;

/// Result of resolving a typed food name against the catalog.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum TextLookup {
    Found(NutritionFacts),
    Suggestions(Vec<String>),
    NotFound,
}

/// Report for one photo plus the annotated image, if the workflow sent one.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoAnalysis {
    pub report: Report,
    pub visualization: Option<String>,
}

/// Shared entry point for every front-end: photos, raw detections and text.
pub struct FoodScanner {
    catalog: Arc<NutritionCatalog>,
    normalizer: DetectionNormalizer,
    aggregator: ReportAggregator,
    recognition: Option<RecognitionClient>,
}

impl FoodScanner {
    pub fn new(
        catalog: Arc<NutritionCatalog>,
        resolver: NutritionResolver,
        normalizer: DetectionNormalizer,
    ) -> Self {
        Self {
            catalog,
            normalizer,
            aggregator: ReportAggregator::new(resolver),
            recognition: None,
        }
    }

    pub fn with_recognition(mut self, client: RecognitionClient) -> Self {
        self.recognition = Some(client);
        self
    }

    /// Wires catalog, Open Food Facts fallback and (when a key is present)
    /// photo recognition from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let catalog = match &config.catalog_csv {
            Some(path) => NutritionCatalog::from_csv(path)
                .with_context(|| format!("Failed to load food catalog from {:?}", path))?,
            None => NutritionCatalog::builtin(),
        };
        let catalog = Arc::new(catalog);
        log::info!("Food catalog ready with {} entries", catalog.len());

        let food_facts = OpenFoodFactsClient::new(&config.open_food_facts_url, config.food_facts_timeout)
            .context("Failed to build Open Food Facts client")?;
        let resolver = NutritionResolver::new(catalog.clone())
            .with_external_lookup(Arc::new(food_facts))
            .with_lookup_timeout(config.food_facts_timeout);
        let normalizer =
            DetectionNormalizer::new(config.confidence_threshold_percent, config.max_detections);

        let mut scanner = Self::new(catalog, resolver, normalizer);
        match &config.roboflow_api_key {
            Some(api_key) => {
                let client = RecognitionClient::new(
                    &config.roboflow_workflow_base_url,
                    &config.roboflow_workflow_id,
                    &config.roboflow_workspace,
                    api_key,
                    config.recognition_timeout,
                )
                .context("Failed to build recognition client")?;
                scanner = scanner.with_recognition(client);
            }
            None => log::warn!("ROBOFLOW_API_KEY is not set; photo recognition is disabled"),
        }
        Ok(scanner)
    }

    pub fn catalog(&self) -> &NutritionCatalog {
        &self.catalog
    }

    pub fn can_recognize_photos(&self) -> bool {
        self.recognition.is_some()
    }

    pub async fn analyze_detections(&self, raw_detections: &[RawDetection]) -> Report {
        let normalized = self.normalizer.normalize(raw_detections);
        log::debug!(
            "{} raw detections normalized to {} rows",
            raw_detections.len(),
            normalized.len()
        );
        self.aggregator.aggregate(&normalized).await
    }

    /// An empty report means nothing was recognized above the threshold,
    /// including when recognition is unavailable.
    pub async fn analyze_photo(&self, image: &[u8]) -> PhotoAnalysis {
        let outcome = match &self.recognition {
            Some(client) => client.detect(image).await,
            None => {
                log::warn!("Photo received but recognition is not configured");
                Default::default()
            }
        };
        PhotoAnalysis {
            report: self.analyze_detections(&outcome.detections).await,
            visualization: outcome.visualization,
        }
    }

    pub fn lookup_text(&self, query: &str) -> TextLookup {
        if let Some(facts) = self.catalog.lookup_exact(query) {
            return TextLookup::Found(facts);
        }
        let suggestions = self.catalog.lookup_by_substring(query);
        if suggestions.is_empty() {
            TextLookup::NotFound
        } else {
            TextLookup::Suggestions(suggestions)
        }
    }
}
