use crate::models::{AggregatedItem, NormalizedDetection, Report};
use crate::resolver::NutritionResolver;

/// Per-label row before nutrition is attached.
#[derive(Debug, Clone, PartialEq)]
struct LabelGroup {
    label: String,
    count: u32,
    confidence_percent: f32,
}

/// Merges rows sharing a label (counts summed, best confidence kept),
/// preserving first-seen order.
fn group_by_label(detections: &[NormalizedDetection]) -> Vec<LabelGroup> {
    let mut groups: Vec<LabelGroup> = Vec::new();
    for detection in detections {
        let count = detection.occurrences.max(1);
        match groups.iter_mut().find(|g| g.label == detection.label) {
            Some(group) => {
                group.count += count;
                group.confidence_percent = group.confidence_percent.max(detection.confidence_percent);
            }
            None => groups.push(LabelGroup {
                label: detection.label.clone(),
                count,
                confidence_percent: detection.confidence_percent,
            }),
        }
    }
    groups
}

pub struct ReportAggregator {
    resolver: NutritionResolver,
}

impl ReportAggregator {
    pub fn new(resolver: NutritionResolver) -> Self {
        Self { resolver }
    }

    pub async fn aggregate(&self, detections: &[NormalizedDetection]) -> Report {
        let mut items = Vec::new();
        for group in group_by_label(detections) {
            let facts = self.resolver.resolve(&group.label).await;
            let count = group.count as f32;
            items.push(AggregatedItem {
                key: group.label,
                display_name: facts.display_name.clone(),
                count: group.count,
                confidence_percent: group.confidence_percent,
                kcal_total: facts.kcal_per_100g * count,
                protein_g_total: facts.protein_g_per_100g * count,
                fat_g_total: facts.fat_g_per_100g * count,
                carbohydrate_g_total: facts.carbohydrate_g_per_100g * count,
                facts,
            });
        }
        build_report(items)
    }
}

/// Sums item totals into a report.
pub fn build_report(items: Vec<AggregatedItem>) -> Report {
    let mut report = Report::default();

    for item in &items {
        macro_rules! add_total {
            ($report_field:ident, $item_field:ident) => {
                report.$report_field += item.$item_field;
            };
        }
        add_total!(total_kcal, kcal_total);
        add_total!(total_protein_g, protein_g_total);
        add_total!(total_fat_g, fat_g_total);
        add_total!(total_carbohydrate_g, carbohydrate_g_total);
        report.item_count += item.count;
    }

    report.unique_type_count = items.len() as u32;
    report.items = items;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NutritionCatalog;
    use crate::models::FactsSource;
    use std::sync::Arc;

    fn aggregator() -> ReportAggregator {
        ReportAggregator::new(NutritionResolver::new(Arc::new(NutritionCatalog::builtin())))
    }

    fn row(label: &str, confidence_percent: f32, occurrences: u32) -> NormalizedDetection {
        NormalizedDetection {
            label: label.to_string(),
            confidence_percent,
            occurrences,
        }
    }

    #[tokio::test]
    async fn test_occurrences_scale_item_totals() {
        let report = aggregator().aggregate(&[row("apple", 90.0, 2)]).await;
        assert_eq!(report.items.len(), 1);
        let apple = &report.items[0];
        assert_eq!(apple.key, "apple");
        assert_eq!(apple.display_name, "яблоко");
        assert_eq!(apple.count, 2);
        assert_eq!(apple.confidence_percent, 90.0);
        assert_eq!(apple.kcal_total, 104.0);
        assert_eq!(apple.carbohydrate_g_total, 28.0);
        assert_eq!(report.total_kcal, 104.0);
        assert_eq!(report.item_count, 2);
        assert_eq!(report.unique_type_count, 1);
    }

    #[tokio::test]
    async fn test_totals_sum_across_items_in_first_seen_order() {
        let report = aggregator()
            .aggregate(&[row("pizza", 88.0, 1), row("durian", 61.5, 1), row("tea", 70.0, 3)])
            .await;
        let keys: Vec<&str> = report.items.iter().map(|i| i.key.as_str()).collect();
        assert_eq!(keys, vec!["pizza", "durian", "tea"]);
        assert_eq!(report.items[1].facts.source, FactsSource::Default);
        assert_eq!(report.items[1].display_name, "durian");
        // 266 + 200 + 3 * 1
        assert_eq!(report.total_kcal, 469.0);
        // 11 + 10 + 0
        assert_eq!(report.total_protein_g, 21.0);
        // 10 + 10 + 0
        assert_eq!(report.total_fat_g, 20.0);
        // 33 + 20 + 0
        assert_eq!(report.total_carbohydrate_g, 53.0);
        assert_eq!(report.item_count, 5);
        assert_eq!(report.unique_type_count, 3);
    }

    #[tokio::test]
    async fn test_repeated_labels_are_merged() {
        let report = aggregator()
            .aggregate(&[row("egg", 55.0, 1), row("milk", 60.0, 1), row("egg", 75.5, 2)])
            .await;
        assert_eq!(report.unique_type_count, 2);
        let egg = &report.items[0];
        assert_eq!(egg.key, "egg");
        assert_eq!(egg.count, 3);
        assert_eq!(egg.confidence_percent, 75.5);
        assert_eq!(egg.kcal_total, 465.0);
    }

    #[tokio::test]
    async fn test_zero_occurrences_count_as_one() {
        let report = aggregator().aggregate(&[row("rice", 50.0, 0)]).await;
        assert_eq!(report.items[0].count, 1);
        assert_eq!(report.total_kcal, 130.0);
    }

    #[tokio::test]
    async fn test_empty_input_gives_empty_report() {
        let report = aggregator().aggregate(&[]).await;
        assert!(report.is_empty());
        assert_eq!(report, Report::default());
        assert_eq!(report.item_count, 0);
        assert_eq!(report.unique_type_count, 0);
        assert_eq!(report.total_kcal, 0.0);
    }
}
