use chrono::{FixedOffset, Offset, Utc};
use image::ImageFormat;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct ModelEntry {
    pub name: String,
    pub path: PathBuf,
}

impl ModelEntry {
    pub fn new(name: &str, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Index order matches the output order of every model in `models`.
    pub class_labels: Vec<String>,
    /// (height, width)
    pub target_size: (u32, u32),
    pub models: Vec<ModelEntry>,
    pub top_k: usize,
    pub accepted_formats: Vec<ImageFormat>,
    pub logger_timezone: FixedOffset,
}

const DEFAULT_MODELS_DIR: &str = "models";

const DEFAULT_MODEL_FILES: [(&str, &str); 3] = [
    ("CNN Scratch", "scratch_cnn.onnx"),
    ("EfficientNet-B0", "effnetb0.onnx"),
    ("MobileNetV2", "mobilenetv2.onnx"),
];

impl Default for Config {
    fn default() -> Self {
        Self {
            class_labels: ["daisy", "dandelion", "rose", "sunflower", "tulip"]
                .iter()
                .map(|label| label.to_string())
                .collect(),
            target_size: (224, 224),
            models: default_models(Path::new(DEFAULT_MODELS_DIR)),
            top_k: 3,
            accepted_formats: vec![ImageFormat::Jpeg, ImageFormat::Png],
            logger_timezone: western_indonesia_time(),
        }
    }
}

impl Config {
    pub fn with_models_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.models = self
            .models
            .into_iter()
            .map(|entry| {
                let file_name = entry.path.file_name().map(PathBuf::from).unwrap_or_default();
                ModelEntry {
                    name: entry.name,
                    path: dir.as_ref().join(file_name),
                }
            })
            .collect();
        self
    }

    /// Expected model input shape, batch first, channels last.
    pub fn input_shape(&self) -> [usize; 4] {
        let (height, width) = self.target_size;
        [1, height as usize, width as usize, 3]
    }
}

fn default_models(dir: &Path) -> Vec<ModelEntry> {
    DEFAULT_MODEL_FILES
        .iter()
        .map(|(name, file)| ModelEntry::new(name, dir.join(file)))
        .collect()
}

fn western_indonesia_time() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).unwrap_or_else(|| Utc.fix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_order() {
        let config = Config::default();
        let names: Vec<&str> = config.models.iter().map(|m| m.name.as_str()).collect();

        assert_eq!(names, vec!["CNN Scratch", "EfficientNet-B0", "MobileNetV2"]);
        assert_eq!(config.input_shape(), [1, 224, 224, 3]);
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn test_with_models_dir_keeps_file_names() {
        let config = Config::default().with_models_dir("/opt/flowers");

        assert_eq!(
            config.models[1].path,
            PathBuf::from("/opt/flowers/effnetb0.onnx")
        );
    }
}
