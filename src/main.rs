use config::Config;
use error::BoxError;
use library::logger::{impl_console::LoggerConsole, interface::Logger};
use model::impl_fake::{FakeOutput, ModelLoaderFake};
use model::impl_tract_onnx::ModelLoaderTractOnnx;
use model::interface::ModelLoader;
use model_registry::cache::impl_in_memory::ModelCacheInMemory;
use model_registry::registry::ModelRegistry;
use pipeline::classify::Pipeline;
use presentation::impl_console::PresenterConsole;
use presentation::impl_gui::PresenterGui;
use std::path::Path;
use std::sync::Arc;

mod config;
mod error;
mod history;
mod image_normalizer;
mod inference;
mod library;
mod model;
mod model_registry;
mod pipeline;
mod presentation;

fn main() -> Result<(), BoxError> {
    let mut config = Config::default();

    if let Ok(dir) = std::env::var("FLOWER_MODELS_DIR") {
        config = config.with_models_dir(dir);
    }

    let logger: Arc<dyn Logger + Send + Sync> =
        Arc::new(LoggerConsole::new(config.logger_timezone));

    let loader: Arc<dyn ModelLoader> = if std::env::var("FLOWER_FAKE_MODELS").as_deref() == Ok("1") {
        let _ = logger.info("using fake models with random scores");
        Arc::new(ModelLoaderFake::new(FakeOutput::Random {
            num_classes: config.class_labels.len(),
        }))
    } else {
        Arc::new(ModelLoaderTractOnnx::new(config.input_shape()))
    };

    let registry = Arc::new(ModelRegistry::new(
        config.models.clone(),
        loader,
        Arc::new(ModelCacheInMemory::new()),
        logger.clone(),
    ));

    let pipeline = Arc::new(Pipeline::new(&config, registry, logger));

    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.as_slice() {
        [] => PresenterGui::new(pipeline)
            .run()
            .map_err(|error| error.to_string())?,
        [image_path, rest @ ..] => {
            let model_name = match rest.first() {
                Some(name) => name.clone(),
                None => pipeline
                    .model_names()
                    .first()
                    .map(|name| name.to_string())
                    .ok_or("no models configured")?,
            };

            PresenterConsole::new(&pipeline).run(Path::new(image_path), &model_name)?;
        }
    }

    Ok(())
}
