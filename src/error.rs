use image::ImageFormat;
use std::path::{Path, PathBuf};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ImageDecode,
    ModelNotFound,
    ModelLoad,
    ShapeMismatch,
    Inference,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot decode image: {0}")]
    ImageDecode(#[source] image::ImageError),

    #[error("unsupported image format {0:?}")]
    UnsupportedImageFormat(ImageFormat),

    #[error("{}", missing_model_message(.name, .path.as_deref()))]
    ModelNotFound { name: String, path: Option<PathBuf> },

    #[error("cannot load model {}: {source}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("input shape {actual:?} does not match model input {expected:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("inference failed: {0}")]
    Inference(#[source] BoxError),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ImageDecode(_) | Error::UnsupportedImageFormat(_) => ErrorKind::ImageDecode,
            Error::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            Error::ModelLoad { .. } => ErrorKind::ModelLoad,
            Error::ShapeMismatch { .. } => ErrorKind::ShapeMismatch,
            Error::Inference(_) => ErrorKind::Inference,
        }
    }

    pub fn inference(message: impl Into<String>) -> Self {
        Error::Inference(message.into().into())
    }
}

fn missing_model_message(name: &str, path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("model '{}' not found at {}", name, path.display()),
        None => format!("model '{}' is not registered", name),
    }
}
