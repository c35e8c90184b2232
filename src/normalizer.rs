use std::collections::HashMap;

use crate::models::{round1, NormalizedDetection, RawDetection};

pub const DEFAULT_CONFIDENCE_THRESHOLD_PERCENT: f32 = 40.0;
pub const DEFAULT_MAX_RESULTS: usize = 5;

/// Thresholds and deduplicates raw recognition output into one row per label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionNormalizer {
    pub confidence_threshold_percent: f32,
    pub max_results: usize,
}

impl Default for DetectionNormalizer {
    fn default() -> Self {
        Self {
            confidence_threshold_percent: DEFAULT_CONFIDENCE_THRESHOLD_PERCENT,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl DetectionNormalizer {
    pub fn new(confidence_threshold_percent: f32, max_results: usize) -> Self {
        Self {
            confidence_threshold_percent,
            max_results,
        }
    }

    pub fn normalize(&self, raw_detections: &[RawDetection]) -> Vec<NormalizedDetection> {
        normalize_detections(raw_detections, self.confidence_threshold_percent, self.max_results)
    }
}

/// Keeps detections whose percentage is strictly above `threshold_percent`,
/// one row per label with the best confidence rounded to one decimal,
/// in first-seen order, at most `max_results` rows.
pub fn normalize_detections(
    raw_detections: &[RawDetection],
    threshold_percent: f32,
    max_results: usize,
) -> Vec<NormalizedDetection> {
    let mut rows: Vec<NormalizedDetection> = Vec::new();
    let mut row_by_label: HashMap<&str, usize> = HashMap::new();

    for detection in raw_detections {
        if !detection.confidence.is_finite() {
            log::debug!("Dropping detection '{}' with non-finite confidence", detection.label);
            continue;
        }
        let exact_percent = detection.confidence.clamp(0.0, 1.0) * 100.0;
        if exact_percent <= threshold_percent {
            continue;
        }
        let percent = round1(exact_percent);

        match row_by_label.get(detection.label.as_str()) {
            Some(&idx) => {
                let row = &mut rows[idx];
                row.occurrences += 1;
                if percent > row.confidence_percent {
                    row.confidence_percent = percent;
                }
            }
            None => {
                row_by_label.insert(detection.label.as_str(), rows.len());
                rows.push(NormalizedDetection {
                    label: detection.label.clone(),
                    confidence_percent: percent,
                    occurrences: 1,
                });
            }
        }
    }

    rows.truncate(max_results);
    rows
}
