use anyhow::{Result, Context};
use csv::ReaderBuilder;
use std::path::Path;

use super::{CatalogEntry, FoodCategory};

// Expected column headers
pub const KEY_COL: &str = "key";
pub const NAME_COL: &str = "name";
pub const CATEGORY_COL: &str = "category";
pub const KCAL_COL: &str = "kcal/100g";
pub const PROTEIN_COL: &str = "Protein (g/100g)";
pub const FAT_COL: &str = "Fat (g/100g)";
pub const CARB_COL: &str = "Carbohydrate (g/100g)";

/// Missing, unparsable and negative values all read as zero.
fn parse_nutrient(s: &str) -> f32 {
    match s.trim().parse::<f32>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => 0.0,
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| anyhow::anyhow!("Column '{}' not found", name))
}

pub fn load_catalog_csv(csv_path: &Path) -> Result<Vec<CatalogEntry>> {
    if !csv_path.exists() {
        return Err(anyhow::anyhow!("Catalog CSV file not found at: {:?}", csv_path));
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open catalog CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();

    let key_idx = column_index(&headers, KEY_COL)?;
    let name_idx = column_index(&headers, NAME_COL)?;
    let category_idx = column_index(&headers, CATEGORY_COL)?;
    let kcal_idx = column_index(&headers, KCAL_COL)?;
    let protein_idx = column_index(&headers, PROTEIN_COL)?;
    let fat_idx = column_index(&headers, FAT_COL)?;
    let carb_idx = column_index(&headers, CARB_COL)?;

    let mut entries = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let key = record.get(key_idx).unwrap_or("").trim().to_lowercase();
        if key.is_empty() {
            log::debug!("Skipping catalog row {} with empty key", row_index + 1);
            continue;
        }

        let display_name = match record.get(name_idx).map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => key.clone(),
        };

        let raw_category = record.get(category_idx).unwrap_or("");
        let category = FoodCategory::parse(raw_category).ok_or_else(|| {
            anyhow::anyhow!("Unknown category '{}' at row {}", raw_category, row_index + 1)
        })?;

        entries.push(CatalogEntry {
            key,
            display_name,
            category,
            kcal_per_100g: record.get(kcal_idx).map(parse_nutrient).unwrap_or(0.0),
            protein_g_per_100g: record.get(protein_idx).map(parse_nutrient).unwrap_or(0.0),
            fat_g_per_100g: record.get(fat_idx).map(parse_nutrient).unwrap_or(0.0),
            carbohydrate_g_per_100g: record.get(carb_idx).map(parse_nutrient).unwrap_or(0.0),
        });
    }

    if entries.is_empty() {
        return Err(anyhow::anyhow!("No valid catalog data loaded from {:?}", csv_path));
    }

    log::info!("Loaded {} catalog entries from {:?}", entries.len(), csv_path);
    Ok(entries)
}
