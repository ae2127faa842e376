use crate::error::BoxError;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::tract_ndarray::Array4;

/// A loaded, immutable predictor.
pub trait Model: Send + Sync {
    /// `input` has shape (1, height, width, 3). Returns one score per class label.
    fn predict(&self, input: &Array4<f32>) -> Result<Vec<f32>, BoxError>;
}

/// Turns a serialized artifact into a [`Model`].
pub trait ModelLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Arc<dyn Model>, BoxError>;
}
