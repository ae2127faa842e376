use crate::config::{Config, ModelEntry};
use crate::library::logger::{impl_console::LoggerConsole, interface::Logger};
use crate::model::impl_fake::{FakeOutput, ModelLoaderFake};
use crate::model_registry::cache::impl_in_memory::ModelCacheInMemory;
use crate::model_registry::registry::ModelRegistry;
use crate::pipeline::classify::Pipeline;
use crate::pipeline::session::Session;
use crate::pipeline::upload::ImageUpload;
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;

pub struct Fixture {
    #[allow(dead_code)]
    pub models_dir: TempDir,
    pub config: Config,
    pub loader: Arc<ModelLoaderFake>,
    pub pipeline: Pipeline,
    pub session: Session,
}

impl Fixture {
    /// "A" answers rose, "B" answers tulip, "Broken" fails at inference time
    /// and "Missing" has no artifact.
    pub fn new() -> Self {
        let models_dir = tempfile::tempdir().unwrap();
        let path = |file: &str| models_dir.path().join(file);

        let mut config = Config::default();
        config.models = vec![
            ModelEntry::new("A", path("a.onnx")),
            ModelEntry::new("B", path("b.onnx")),
            ModelEntry::new("Broken", path("broken.onnx")),
            ModelEntry::new("Missing", path("missing.onnx")),
        ];
        for file in ["a.onnx", "b.onnx", "broken.onnx"] {
            std::fs::write(path(file), b"fake").unwrap();
        }

        let loader = Arc::new(
            ModelLoaderFake::new(FakeOutput::Fixed(vec![0.05, 0.10, 0.55, 0.20, 0.10]))
                .with_output_for(path("b.onnx"), FakeOutput::Fixed(vec![0.1, 0.1, 0.1, 0.1, 0.6]))
                .with_output_for(
                    path("broken.onnx"),
                    FakeOutput::Fail("incompatible input".to_string()),
                ),
        );

        let logger: Arc<dyn Logger + Send + Sync> =
            Arc::new(LoggerConsole::new(config.logger_timezone));
        let registry = Arc::new(ModelRegistry::new(
            config.models.clone(),
            loader.clone(),
            Arc::new(ModelCacheInMemory::new()),
            logger.clone(),
        ));
        let pipeline = Pipeline::new(&config, registry, logger);

        Self {
            models_dir,
            config,
            loader,
            pipeline,
            session: Session::new(),
        }
    }

    pub fn png_upload(name: &str, width: u32, height: u32) -> ImageUpload {
        let image = DynamicImage::ImageRgb8(ImageBuffer::from_pixel(width, height, Rgb([180, 60, 120])));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        ImageUpload::new(name, bytes)
    }
}
