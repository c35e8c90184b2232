use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const OPEN_FOOD_FACTS_BASE_URL: &str = "https://world.openfoodfacts.org";
pub const OPEN_FOOD_FACTS_SEARCH_PATH: &str = "/cgi/search.pl";

pub const ROBOFLOW_WORKFLOW_BASE_URL: &str = "https://serverless.roboflow.com/workflow";
pub const ROBOFLOW_DEFAULT_WORKSPACE: &str = "kalori-lsshy";
pub const ROBOFLOW_DEFAULT_WORKFLOW_ID: &str = "detect-count-and-visualize";

// Open Food Facts nutriment field names, per 100 g.
const ENERGY_KCAL_FIELD: &str = "energy-kcal_100g";
const PROTEINS_FIELD: &str = "proteins_100g";
const FAT_FIELD: &str = "fat_100g";
const CARBOHYDRATES_FIELD: &str = "carbohydrates_100g";

// Open Food Facts data is crowd-sourced; a field with an unexpected JSON type
// reads as absent instead of failing the whole response.

fn lenient_products<'de, D>(deserializer: D) -> Result<Vec<OpenFoodFactsProduct>, D::Error>
where
    D: Deserializer<'de>,
{
    let products = match Value::deserialize(deserializer)? {
        Value::Array(list) => list
            .into_iter()
            .filter_map(|product| serde_json::from_value(product).ok())
            .collect(),
        _ => Vec::new(),
    };
    Ok(products)
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map,
        _ => Map::new(),
    })
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OpenFoodFactsSearchResponse {
    #[serde(default, deserialize_with = "lenient_products")]
    pub products: Vec<OpenFoodFactsProduct>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct OpenFoodFactsProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    /// Kept loose: the service mixes numbers and numeric strings.
    #[serde(default, deserialize_with = "lenient_object")]
    pub nutriments: Map<String, Value>,
}

/// Per-100g values as reported by the external service; any may be missing.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ExternalNutriments {
    pub product_name: Option<String>,
    pub energy_kcal_100g: Option<f32>,
    pub proteins_100g: Option<f32>,
    pub fat_100g: Option<f32>,
    pub carbohydrates_100g: Option<f32>,
}

impl ExternalNutriments {
    pub fn has_any_value(&self) -> bool {
        self.energy_kcal_100g.is_some()
            || self.proteins_100g.is_some()
            || self.fat_100g.is_some()
            || self.carbohydrates_100g.is_some()
    }
}

/// Non-negative finite number, given either as JSON number or numeric string.
fn nutrient_value(nutriments: &Map<String, Value>, field: &str) -> Option<f32> {
    let value = match nutriments.get(field)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if value.is_finite() && value >= 0.0 {
        Some(value as f32)
    } else {
        None
    }
}

impl From<&OpenFoodFactsProduct> for ExternalNutriments {
    fn from(product: &OpenFoodFactsProduct) -> Self {
        Self {
            product_name: product
                .product_name
                .as_ref()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            energy_kcal_100g: nutrient_value(&product.nutriments, ENERGY_KCAL_FIELD),
            proteins_100g: nutrient_value(&product.nutriments, PROTEINS_FIELD),
            fat_100g: nutrient_value(&product.nutriments, FAT_FIELD),
            carbohydrates_100g: nutrient_value(&product.nutriments, CARBOHYDRATES_FIELD),
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct WorkflowImage {
    #[serde(rename = "type")]
    pub image_type: String,
    pub value: String,
}

#[derive(Debug, Serialize, Clone)]
pub struct WorkflowRequest {
    pub image: WorkflowImage,
}

impl WorkflowRequest {
    pub fn base64(encoded_image: String) -> Self {
        Self {
            image: WorkflowImage {
                image_type: "base64".to_string(),
                value: encoded_image,
            },
        }
    }
}

/// One detector prediction; box geometry and ids are ignored.
#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowPrediction {
    #[serde(default, rename = "class")]
    pub class_name: String,
    #[serde(default)]
    pub confidence: f32,
}
