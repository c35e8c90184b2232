mod builtin;
pub mod data_loader;

use serde::{Deserialize, Serialize};

use crate::models::{FactsSource, FoodKey, NutritionFacts};

pub use data_loader::load_catalog_csv;

/// Upper bound on "did you mean" suggestions.
pub const MAX_SUGGESTIONS: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FoodCategory {
    Fruits,
    Vegetables,
    ReadyMeals,
    MeatAndFish,
    Dairy,
    Staples,
    Desserts,
    Drinks,
}

impl FoodCategory {
    /// Listing order.
    pub const ALL: [FoodCategory; 8] = [
        FoodCategory::Fruits,
        FoodCategory::Vegetables,
        FoodCategory::ReadyMeals,
        FoodCategory::MeatAndFish,
        FoodCategory::Dairy,
        FoodCategory::Staples,
        FoodCategory::Desserts,
        FoodCategory::Drinks,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FoodCategory::Fruits => "Fruits",
            FoodCategory::Vegetables => "Vegetables",
            FoodCategory::ReadyMeals => "Ready meals",
            FoodCategory::MeatAndFish => "Meat and fish",
            FoodCategory::Dairy => "Dairy and eggs",
            FoodCategory::Staples => "Staples",
            FoodCategory::Desserts => "Desserts",
            FoodCategory::Drinks => "Drinks and soups",
        }
    }

    /// Accepts the variant name or the listing label, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL.into_iter().find(|category| {
            category.label().to_lowercase() == wanted
                || format!("{:?}", category).to_lowercase() == wanted
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CatalogEntry {
    pub key: FoodKey,
    pub display_name: String,
    pub category: FoodCategory,
    pub kcal_per_100g: f32,
    pub protein_g_per_100g: f32,
    pub fat_g_per_100g: f32,
    pub carbohydrate_g_per_100g: f32,
}

impl CatalogEntry {
    pub fn facts(&self) -> NutritionFacts {
        NutritionFacts {
            display_name: self.display_name.clone(),
            kcal_per_100g: self.kcal_per_100g,
            protein_g_per_100g: self.protein_g_per_100g,
            fat_g_per_100g: self.fat_g_per_100g,
            carbohydrate_g_per_100g: self.carbohydrate_g_per_100g,
            source: FactsSource::Catalog,
        }
    }
}

/// Read-only food table, built once at startup and shared by reference.
#[derive(Debug, Clone)]
pub struct NutritionCatalog {
    entries: Vec<CatalogEntry>,
}

fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

impl NutritionCatalog {
    /// Entries keep their given order; later duplicates of a key are dropped.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let mut unique: Vec<CatalogEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            if unique.iter().any(|existing| existing.key == entry.key) {
                log::warn!("Duplicate catalog key '{}' ignored", entry.key);
                continue;
            }
            unique.push(entry);
        }
        Self { entries: unique }
    }

    pub fn builtin() -> Self {
        Self::new(builtin::builtin_entries())
    }

    pub fn from_csv(csv_path: &std::path::Path) -> anyhow::Result<Self> {
        Ok(Self::new(load_catalog_csv(csv_path)?))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn entry(&self, key: &str) -> Option<&CatalogEntry> {
        let wanted = normalize_query(key);
        if wanted.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| {
            entry.key.to_lowercase() == wanted || entry.display_name.to_lowercase() == wanted
        })
    }

    /// Matches the key or the display name exactly, ignoring case and
    /// surrounding whitespace.
    pub fn lookup_exact(&self, key: &str) -> Option<NutritionFacts> {
        self.entry(key).map(CatalogEntry::facts)
    }

    /// Display names that contain the query or share a whole word with it,
    /// in catalog order, capped at `MAX_SUGGESTIONS`.
    pub fn lookup_by_substring(&self, query: &str) -> Vec<String> {
        let wanted = normalize_query(query);
        if wanted.is_empty() {
            return Vec::new();
        }
        let query_tokens: Vec<&str> = wanted.split_whitespace().collect();

        self.entries
            .iter()
            .filter(|entry| {
                let name = entry.display_name.to_lowercase();
                name.contains(&wanted)
                    || name
                        .split_whitespace()
                        .any(|token| query_tokens.contains(&token))
            })
            .map(|entry| entry.display_name.clone())
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    /// Entries grouped by category in listing order; empty categories omitted.
    pub fn by_category(&self) -> Vec<(FoodCategory, Vec<&CatalogEntry>)> {
        FoodCategory::ALL
            .into_iter()
            .filter_map(|category| {
                let members: Vec<&CatalogEntry> = self
                    .entries
                    .iter()
                    .filter(|entry| entry.category == category)
                    .collect();
                if members.is_empty() {
                    None
                } else {
                    Some((category, members))
                }
            })
            .collect()
    }
}

impl Default for NutritionCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = NutritionCatalog::builtin();
        assert_eq!(catalog.len(), 34);
        let apple = catalog.lookup_exact("apple").unwrap();
        assert_eq!(apple.display_name, "яблоко");
        assert_eq!(apple.kcal_per_100g, 52.0);
        assert_eq!(apple.source, FactsSource::Catalog);
    }

    #[test]
    fn test_lookup_exact_by_key_and_display_name() {
        let catalog = NutritionCatalog::builtin();
        assert!(catalog.lookup_exact("  Ice Cream ").is_some());
        let by_name = catalog.lookup_exact("Банан").unwrap();
        assert_eq!(by_name.kcal_per_100g, 89.0);
        assert!(catalog.lookup_exact("durian").is_none());
        assert!(catalog.lookup_exact("").is_none());
        // Substrings of a display name are not exact matches.
        assert!(catalog.lookup_exact("карто").is_none());
    }

    #[test]
    fn test_lookup_by_substring_contains_and_token_match() {
        let catalog = NutritionCatalog::builtin();
        assert_eq!(
            catalog.lookup_by_substring("карто"),
            vec!["картофель".to_string(), "картофель фри".to_string()]
        );
        // "фри" is a whole token of "картофель фри"; "жареный" matches nothing.
        assert_eq!(
            catalog.lookup_by_substring("жареный фри"),
            vec!["картофель фри".to_string()]
        );
        assert!(catalog.lookup_by_substring("   ").is_empty());
        assert!(catalog.lookup_by_substring("xyz").is_empty());
    }

    #[test]
    fn test_lookup_by_substring_is_capped() {
        let catalog = NutritionCatalog::builtin();
        let hits = catalog.lookup_by_substring("о");
        assert_eq!(hits.len(), MAX_SUGGESTIONS);
        assert_eq!(hits[0], "яблоко");
    }

    #[test]
    fn test_duplicate_keys_keep_first_entry() {
        let mut entries = builtin::builtin_entries();
        let mut duplicate = entries[0].clone();
        duplicate.kcal_per_100g = 999.0;
        entries.push(duplicate);
        let catalog = NutritionCatalog::new(entries);
        assert_eq!(catalog.len(), 34);
        assert_eq!(catalog.lookup_exact("apple").unwrap().kcal_per_100g, 52.0);
    }

    #[test]
    fn test_by_category_order_and_membership() {
        let catalog = NutritionCatalog::builtin();
        let groups = catalog.by_category();
        assert_eq!(groups.len(), 8);
        assert_eq!(groups[0].0, FoodCategory::Fruits);
        let fruit_keys: Vec<&str> = groups[0].1.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(fruit_keys, vec!["apple", "banana", "orange"]);
        let total: usize = groups.iter().map(|(_, members)| members.len()).sum();
        assert_eq!(total, catalog.len());
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(FoodCategory::parse("ReadyMeals"), Some(FoodCategory::ReadyMeals));
        assert_eq!(FoodCategory::parse("meat and fish"), Some(FoodCategory::MeatAndFish));
        assert_eq!(FoodCategory::parse("snacks"), None);
    }
}
