use crate::error::BoxError;
use crate::model::interface::{Model, ModelLoader};
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

pub struct ModelTractOnnx {
    model: SimplePlan<TypedFact, Box<dyn TypedOp>, TypedModel>,
}

impl ModelTractOnnx {
    /// Input is pinned to `input_shape` so the plan can be fully optimized.
    pub fn new(path: &Path, input_shape: [usize; 4]) -> Result<Self, BoxError> {
        let model = tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(0, f32::fact(input_shape).into())?
            .into_optimized()?
            .into_runnable()?;

        Ok(Self { model })
    }
}

impl Model for ModelTractOnnx {
    fn predict(&self, input: &tract_ndarray::Array4<f32>) -> Result<Vec<f32>, BoxError> {
        let outputs = self
            .model
            .run(tvec!(input.clone().into_tensor().into_tvalue()))?;

        let output = outputs
            .first()
            .ok_or("model produced no outputs")?
            .to_array_view::<f32>()?;

        Ok(output.iter().copied().collect())
    }
}

pub struct ModelLoaderTractOnnx {
    input_shape: [usize; 4],
}

impl ModelLoaderTractOnnx {
    pub fn new(input_shape: [usize; 4]) -> Self {
        Self { input_shape }
    }
}

impl ModelLoader for ModelLoaderTractOnnx {
    fn load(&self, path: &Path) -> Result<Arc<dyn Model>, BoxError> {
        Ok(Arc::new(ModelTractOnnx::new(path, self.input_shape)?))
    }
}
