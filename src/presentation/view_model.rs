use crate::error::{Error, ErrorKind};
use crate::history::log::HistoryLog;
use crate::inference::prediction::PredictionResult;

#[derive(Debug, Clone, PartialEq)]
pub struct TopRow {
    pub rank: usize,
    pub class: String,
    pub prob: String,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionView {
    pub headline: String,
    pub badge: String,
    /// Confidence clamped to 0.0..=1.0 for progress bars.
    pub progress: f32,
    pub top_rows: Vec<TopRow>,
    pub class_rows: Vec<(String, f32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub time: String,
    pub model: String,
    pub file: String,
    pub pred: String,
    pub prob: String,
    pub percent: String,
}

pub fn prediction_view(prediction: &PredictionResult) -> PredictionView {
    let confidence = prediction.confidence;

    PredictionView {
        headline: format!("Prediction: {}", prediction.label),
        badge: format!(
            "Confidence: {:.2}% (prob={:.4})",
            confidence * 100.0,
            confidence
        ),
        progress: confidence.clamp(0.0, 1.0),
        top_rows: prediction
            .top_k
            .iter()
            .enumerate()
            .map(|(i, score)| TopRow {
                rank: i + 1,
                class: score.label.clone(),
                prob: format!("{:.4}", score.probability),
                percent: format!("{:.2}%", score.probability * 100.0),
            })
            .collect(),
        class_rows: prediction
            .probabilities
            .iter()
            .map(|score| (score.label.clone(), score.probability))
            .collect(),
    }
}

pub fn history_rows(history: &HistoryLog) -> Vec<HistoryRow> {
    history
        .list()
        .map(|entry| HistoryRow {
            time: entry.formatted_time(),
            model: entry.model.clone(),
            file: entry.file.clone(),
            pred: entry.label.clone(),
            prob: format!("{:.4}", entry.probability),
            percent: format!("{:.2}", entry.percent),
        })
        .collect()
}

pub fn error_message(error: &Error) -> String {
    match error.kind() {
        ErrorKind::ImageDecode => format!("Could not read the image: {}", error),
        ErrorKind::ModelNotFound => format!("Model is not available: {}", error),
        ErrorKind::ModelLoad => format!("Failed to load the model: {}", error),
        ErrorKind::ShapeMismatch => format!(
            "Internal error: the prepared image does not fit the model input. {}",
            error
        ),
        ErrorKind::Inference => format!(
            "Prediction failed. This usually means the preprocessing does not match the model.\n\nDetails: {}",
            error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::history::entry::HistoryEntry;
    use crate::inference::engine::InferenceEngine;
    use chrono::{FixedOffset, TimeZone};
    use std::path::PathBuf;

    fn prediction() -> PredictionResult {
        InferenceEngine::from_config(&Config::default())
            .rank(&[0.05, 0.10, 0.55, 0.20, 0.10])
            .unwrap()
    }

    #[test]
    fn test_prediction_view_formats_scores() {
        let view = prediction_view(&prediction());

        assert_eq!(view.headline, "Prediction: rose");
        assert_eq!(view.badge, "Confidence: 55.00% (prob=0.5500)");
        assert_eq!(view.progress, 0.55);
        assert_eq!(
            view.top_rows[1],
            TopRow {
                rank: 2,
                class: "sunflower".to_string(),
                prob: "0.2000".to_string(),
                percent: "20.00%".to_string(),
            }
        );
        assert_eq!(view.class_rows.len(), 5);
        assert_eq!(view.class_rows[0], ("daisy".to_string(), 0.05));
    }

    #[test]
    fn test_progress_is_clamped() {
        let mut result = prediction();
        result.confidence = 1.2;

        assert_eq!(prediction_view(&result).progress, 1.0);
    }

    #[test]
    fn test_history_rows_follow_log_order() {
        let time = FixedOffset::east_opt(7 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 6, 1, 14, 30, 0)
            .unwrap();
        let mut log = HistoryLog::new();
        log.append(HistoryEntry::new(time, "A", "one.png", &prediction()));
        log.append(HistoryEntry::new(time, "B", "two.png", &prediction()));

        let rows = history_rows(&log);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].model, "B");
        assert_eq!(rows[0].time, "2024-06-01 14:30:00");
        assert_eq!(rows[0].prob, "0.5500");
        assert_eq!(rows[0].percent, "55.00");
    }

    #[test]
    fn test_error_messages_differ_by_kind() {
        let errors = [
            Error::ImageDecode(image::ImageError::IoError(std::io::Error::other("eof"))),
            Error::ModelNotFound {
                name: "A".to_string(),
                path: Some(PathBuf::from("a.onnx")),
            },
            Error::inference("boom"),
        ];

        let messages: Vec<String> = errors.iter().map(error_message).collect();

        assert!(messages[0].starts_with("Could not read the image"));
        assert!(messages[1].starts_with("Model is not available"));
        assert!(messages[2].starts_with("Prediction failed"));
        assert!(messages[2].contains("boom"));
    }
}
