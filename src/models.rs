use serde::{Deserialize, Serialize};

/// Canonical identifier of a catalog food (e.g. "apple", "ice cream").
pub type FoodKey = String;

pub const DEFAULT_KCAL_PER_100G: f32 = 200.0;
pub const DEFAULT_PROTEIN_PER_100G: f32 = 10.0;
pub const DEFAULT_FAT_PER_100G: f32 = 10.0;
pub const DEFAULT_CARBS_PER_100G: f32 = 20.0;

/// Where a set of nutrition facts came from.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum FactsSource {
    Catalog,
    ExternalLookup,
    Default,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NutritionFacts {
    pub display_name: String,
    pub kcal_per_100g: f32,
    pub protein_g_per_100g: f32,
    pub fat_g_per_100g: f32,
    pub carbohydrate_g_per_100g: f32,
    pub source: FactsSource,
}

/// Absolute nutrient amounts for a weighed portion.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct PortionNutrition {
    pub grams: f32,
    pub kcal: f32,
    pub protein_g: f32,
    pub fat_g: f32,
    pub carbohydrate_g: f32,
}

impl NutritionFacts {
    /// Generic fallback used when neither the catalog nor the external
    /// lookup knows the food.
    pub fn fallback(display_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            kcal_per_100g: DEFAULT_KCAL_PER_100G,
            protein_g_per_100g: DEFAULT_PROTEIN_PER_100G,
            fat_g_per_100g: DEFAULT_FAT_PER_100G,
            carbohydrate_g_per_100g: DEFAULT_CARBS_PER_100G,
            source: FactsSource::Default,
        }
    }

    pub fn for_portion(&self, grams: f32) -> PortionNutrition {
        if !grams.is_finite() || grams <= 0.0 {
            return PortionNutrition::default();
        }
        let scale = grams / 100.0;
        PortionNutrition {
            grams,
            kcal: self.kcal_per_100g * scale,
            protein_g: self.protein_g_per_100g * scale,
            fat_g: self.fat_g_per_100g * scale,
            carbohydrate_g: self.carbohydrate_g_per_100g * scale,
        }
    }
}

/// One labelled observation straight from the recognition service.
/// `confidence` is a fraction in [0, 1].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RawDetection {
    pub label: String,
    pub confidence: f32,
}

impl RawDetection {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence,
        }
    }
}

/// One row per distinct label after thresholding and deduplication.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NormalizedDetection {
    pub label: String,
    /// Highest confidence seen for the label, in percent, one decimal.
    pub confidence_percent: f32,
    /// How many above-threshold raw detections collapsed into this row.
    pub occurrences: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AggregatedItem {
    pub key: FoodKey,
    pub display_name: String,
    pub count: u32,
    pub confidence_percent: f32,
    pub facts: NutritionFacts,
    pub kcal_total: f32,
    pub protein_g_total: f32,
    pub fat_g_total: f32,
    pub carbohydrate_g_total: f32,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Report {
    pub items: Vec<AggregatedItem>,
    pub total_kcal: f32,
    pub total_protein_g: f32,
    pub total_fat_g: f32,
    pub total_carbohydrate_g: f32,
    pub item_count: u32,
    pub unique_type_count: u32,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Rounds to one decimal place.
pub fn round1(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}
