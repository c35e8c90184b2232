//! Plain-text replies for chat or terminal front-ends.

use crate::catalog::NutritionCatalog;
use crate::models::{FactsSource, NutritionFacts, Report};
use crate::pipeline::TextLookup;

/// Portion used for the worked example under a facts card.
pub const EXAMPLE_PORTION_G: f32 = 250.0;

pub const NOT_RECOGNIZED_REPLY: &str = "Could not recognize any food in the photo.\n\
\n\
Possible reasons:\n\
- the food is hard to see\n\
- the product is not in the database\n\
- the photo is too dark or blurry\n\
\n\
Try a sharper photo with the food filling most of the frame, or send the product name as text.";

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn source_note(source: FactsSource) -> &'static str {
    match source {
        FactsSource::Catalog => "",
        FactsSource::ExternalLookup => " (Open Food Facts)",
        FactsSource::Default => " (estimate)",
    }
}

pub fn render_report(report: &Report) -> String {
    if report.is_empty() {
        return NOT_RECOGNIZED_REPLY.to_string();
    }

    let mut out = String::from("Analysis results:\n\n");
    for (i, item) in report.items.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} ({} pcs)\n",
            i + 1,
            capitalize(&item.display_name),
            item.count
        ));
        out.push_str(&format!("   Confidence: {:.1}%\n", item.confidence_percent));
        out.push_str(&format!(
            "   Calories: {} kcal/100g{}\n\n",
            item.facts.kcal_per_100g,
            source_note(item.facts.source)
        ));
    }

    out.push_str("Summary:\n");
    out.push_str(&format!("- Objects found: {}\n", report.item_count));
    out.push_str(&format!("- Unique types: {}\n", report.unique_type_count));
    out.push_str(&format!("- Estimated calories: {:.0} kcal\n", report.total_kcal));
    out.push_str(&format!(
        "- Protein / fat / carbs: {:.1} g / {:.1} g / {:.1} g\n\n",
        report.total_protein_g, report.total_fat_g, report.total_carbohydrate_g
    ));
    out.push_str("Values are approximate and given per 100 g of each product.");
    out
}

pub fn render_facts(facts: &NutritionFacts, portion_g: f32) -> String {
    let portion = facts.for_portion(portion_g);
    format!(
        "{}{}\n\n\
         Nutrition per 100 g:\n\
         - Calories: {} kcal\n\
         - Protein: {} g\n\
         - Fat: {} g\n\
         - Carbs: {} g\n\n\
         For {} g: {:.0} kcal, {:.1} g protein, {:.1} g fat, {:.1} g carbs",
        capitalize(&facts.display_name),
        source_note(facts.source),
        facts.kcal_per_100g,
        facts.protein_g_per_100g,
        facts.fat_g_per_100g,
        facts.carbohydrate_g_per_100g,
        portion.grams,
        portion.kcal,
        portion.protein_g,
        portion.fat_g,
        portion.carbohydrate_g
    )
}

pub fn render_text_lookup(query: &str, lookup: &TextLookup, portion_g: f32) -> String {
    match lookup {
        TextLookup::Found(facts) => render_facts(facts, portion_g),
        TextLookup::Suggestions(names) => {
            let mut out = format!("'{}' was not found.\n\nSimilar products:\n", query.trim());
            for name in names {
                out.push_str(&format!("- {}\n", name));
            }
            out.push_str("\nUse `list` for the full catalog.");
            out
        }
        TextLookup::NotFound => format!(
            "Product '{}' was not found.\n\nTry sending a photo, using `list`, or checking the spelling.",
            query.trim()
        ),
    }
}

pub fn render_catalog(catalog: &NutritionCatalog) -> String {
    let mut out = String::from("Recognized products:\n\n");
    for (category, entries) in catalog.by_category() {
        out.push_str(&format!("{}:\n", category.label()));
        for entry in entries {
            out.push_str(&format!("- {} ({})\n", entry.display_name, entry.key));
        }
        out.push('\n');
    }
    out.push_str(&format!("Total: {} products", catalog.len()));
    out
}
