use crate::config::Config;
use crate::error::Error;
use crate::history::entry::HistoryEntry;
use crate::image_normalizer::letterbox::ImageNormalizer;
use crate::image_normalizer::normalized_image::NormalizedImage;
use crate::inference::engine::InferenceEngine;
use crate::inference::prediction::PredictionResult;
use crate::library::logger::interface::Logger;
use crate::model_registry::registry::ModelRegistry;
use crate::pipeline::session::Session;
use crate::pipeline::upload::ImageUpload;
use chrono::{FixedOffset, Utc};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Classification {
    pub normalized: NormalizedImage,
    pub prediction: PredictionResult,
}

/// normalize -> resolve model -> predict -> record history.
pub struct Pipeline {
    normalizer: ImageNormalizer,
    registry: Arc<ModelRegistry>,
    engine: InferenceEngine,
    timezone: FixedOffset,
    logger: Arc<dyn Logger + Send + Sync>,
}

impl Pipeline {
    pub fn new(
        config: &Config,
        registry: Arc<ModelRegistry>,
        logger: Arc<dyn Logger + Send + Sync>,
    ) -> Self {
        Self {
            normalizer: ImageNormalizer::from_config(config),
            registry,
            engine: InferenceEngine::from_config(config),
            timezone: config.logger_timezone,
            logger: logger.with_namespace("pipeline"),
        }
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.registry.names()
    }

    pub fn loaded_models(&self) -> usize {
        self.registry.cached_count()
    }

    /// Preprocesses without running a model, for previews.
    pub fn normalize(&self, upload: &ImageUpload) -> Result<NormalizedImage, Error> {
        self.normalizer.normalize(&upload.bytes)
    }

    /// Runs one request. History is only touched when every stage succeeds.
    pub fn classify(
        &self,
        session: &mut Session,
        upload: &ImageUpload,
        model_name: &str,
    ) -> Result<Classification, Error> {
        let _ = self
            .logger
            .info(&format!("classifying '{}' with '{}'", upload.name, model_name));

        let result = self.run(upload, model_name);

        match &result {
            Ok(classification) => {
                let prediction = &classification.prediction;
                let _ = self.logger.info(&format!(
                    "'{}' -> {} ({:.4})",
                    upload.name, prediction.label, prediction.confidence
                ));

                let timestamp = Utc::now().with_timezone(&self.timezone);
                session
                    .history
                    .append(HistoryEntry::new(timestamp, model_name, &upload.name, prediction));
            }
            Err(error) => {
                let _ = self
                    .logger
                    .error(&format!("'{}' failed: {}", upload.name, error));
            }
        }

        result
    }

    fn run(&self, upload: &ImageUpload, model_name: &str) -> Result<Classification, Error> {
        let normalized = self.normalizer.normalize(&upload.bytes)?;

        let model = self.registry.resolve(model_name)?;

        let prediction = self.engine.predict(model.as_ref(), &normalized.tensor)?;

        Ok(Classification {
            normalized,
            prediction,
        })
    }
}
