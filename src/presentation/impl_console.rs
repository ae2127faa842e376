use crate::error::BoxError;
use crate::history::log::HistoryLog;
use crate::pipeline::classify::{Classification, Pipeline};
use crate::pipeline::session::Session;
use crate::pipeline::upload::ImageUpload;
use crate::presentation::view_model::{error_message, history_rows, prediction_view};
use std::fmt::Write;
use std::path::Path;

pub struct PresenterConsole<'a> {
    pipeline: &'a Pipeline,
    session: Session,
}

impl<'a> PresenterConsole<'a> {
    pub fn new(pipeline: &'a Pipeline) -> Self {
        Self {
            pipeline,
            session: Session::new(),
        }
    }

    pub fn run(&mut self, image_path: &Path, model_name: &str) -> Result<(), BoxError> {
        let upload = ImageUpload::from_path(image_path)?;

        match self.pipeline.classify(&mut self.session, &upload, model_name) {
            Ok(classification) => {
                println!("{}", render(&classification, &self.session.history));
                Ok(())
            }
            Err(error) => Err(error_message(&error).into()),
        }
    }
}

pub fn render(classification: &Classification, history: &HistoryLog) -> String {
    let view = prediction_view(&classification.prediction);
    let content = classification.normalized.content;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Input: {}x{} content at ({}, {})",
        content.width, content.height, content.x, content.y
    );
    let _ = writeln!(out, "{}", view.headline);
    let _ = writeln!(out, "{}", view.badge);

    let _ = writeln!(out, "\nTop-{}", view.top_rows.len());
    for row in &view.top_rows {
        let _ = writeln!(
            out,
            "  {}. {:<12} {}  {:>7}",
            row.rank, row.class, row.prob, row.percent
        );
    }

    let _ = writeln!(out, "\nAll classes");
    for (label, probability) in &view.class_rows {
        let bar = "#".repeat((probability.clamp(0.0, 1.0) * 40.0).round() as usize);
        let _ = writeln!(out, "  {:<12} {:.4} {}", label, probability, bar);
    }

    let _ = writeln!(out, "\nHistory ({})", history.len());
    for row in history_rows(history) {
        let _ = writeln!(
            out,
            "  {} | {} | {} | {} | {} | {}",
            row.time, row.model, row.file, row.pred, row.prob, row.percent
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::history::entry::HistoryEntry;
    use crate::image_normalizer::letterbox::ImageNormalizer;
    use crate::inference::engine::InferenceEngine;
    use chrono::Utc;
    use image::{DynamicImage, RgbImage};

    #[test]
    fn test_render_lists_prediction_and_history() {
        let config = Config::default();
        let normalized = ImageNormalizer::from_config(&config)
            .normalize_image(&DynamicImage::ImageRgb8(RgbImage::new(400, 300)))
            .unwrap();
        let prediction = InferenceEngine::from_config(&config)
            .rank(&[0.05, 0.10, 0.55, 0.20, 0.10])
            .unwrap();
        let mut history = HistoryLog::new();
        history.append(HistoryEntry::new(
            Utc::now().with_timezone(&config.logger_timezone),
            "MobileNetV2",
            "rose.png",
            &prediction,
        ));

        let text = render(
            &Classification {
                normalized,
                prediction,
            },
            &history,
        );

        assert!(text.contains("Input: 224x168 content at (0, 28)"));
        assert!(text.contains("Prediction: rose"));
        assert!(text.contains("Confidence: 55.00% (prob=0.5500)"));
        assert!(text.contains("History (1)"));
        assert!(text.contains("MobileNetV2 | rose.png | rose | 0.5500 | 55.00"));
    }
}
