use crate::inference::prediction::PredictionResult;
use chrono::{DateTime, FixedOffset};

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub timestamp: DateTime<FixedOffset>,
    pub model: String,
    pub file: String,
    pub label: String,
    /// Confidence rounded to 4 decimals.
    pub probability: f64,
    /// Confidence * 100 rounded to 2 decimals.
    pub percent: f64,
}

impl HistoryEntry {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        model: &str,
        file: &str,
        prediction: &PredictionResult,
    ) -> Self {
        let confidence = prediction.confidence as f64;

        Self {
            timestamp,
            model: model.to_string(),
            file: file.to_string(),
            label: prediction.label.clone(),
            probability: round_to(confidence, 4),
            percent: round_to(confidence * 100.0, 2),
        }
    }

    pub fn formatted_time(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn prediction(confidence: f32) -> PredictionResult {
        PredictionResult {
            label: "tulip".to_string(),
            index: 4,
            confidence,
            probabilities: vec![],
            top_k: vec![],
        }
    }

    #[test]
    fn test_confidence_is_rounded() {
        let offset = FixedOffset::east_opt(7 * 3600).unwrap();
        let timestamp = offset.with_ymd_and_hms(2024, 5, 17, 9, 3, 4).unwrap();

        let entry = HistoryEntry::new(timestamp, "MobileNetV2", "tulip.jpg", &prediction(0.876543));

        assert_eq!(entry.probability, 0.8765);
        assert_eq!(entry.percent, 87.65);
        assert_eq!(entry.label, "tulip");
        assert_eq!(entry.formatted_time(), "2024-05-17 09:03:04");
    }

    #[test]
    fn test_half_way_confidence_rounds_to_even() {
        let timestamp = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
            .unwrap();

        let entry = HistoryEntry::new(timestamp, "CNN Scratch", "rose.png", &prediction(0.03125));

        assert_eq!(entry.probability, 0.0312);
        assert_eq!(entry.percent, 3.12);
    }
}
