use crate::error::BoxError;
use crate::model::interface::{Model, ModelLoader};
use rand::distr::{Distribution, Uniform};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tract_onnx::prelude::tract_ndarray::Array4;

#[derive(Debug, Clone)]
pub enum FakeOutput {
    #[cfg(test)]
    Fixed(Vec<f32>),
    /// Random scores over `num_classes`, normalized to sum to one.
    Random { num_classes: usize },
    #[cfg(test)]
    Fail(String),
}

pub struct ModelFake {
    output: FakeOutput,
}

impl ModelFake {
    pub fn new(output: FakeOutput) -> Self {
        Self { output }
    }
}

impl Model for ModelFake {
    fn predict(&self, _input: &Array4<f32>) -> Result<Vec<f32>, BoxError> {
        match &self.output {
            #[cfg(test)]
            FakeOutput::Fixed(scores) => Ok(scores.clone()),
            FakeOutput::Random { num_classes } => random_probabilities(*num_classes),
            #[cfg(test)]
            FakeOutput::Fail(message) => Err(message.clone().into()),
        }
    }
}

fn random_probabilities(num_classes: usize) -> Result<Vec<f32>, BoxError> {
    let mut rng = rand::rng();

    let dist = Uniform::new(0.0f32, 1.0)?;

    let scores: Vec<f32> = (0..num_classes).map(|_| dist.sample(&mut rng)).collect();
    let total: f32 = scores.iter().sum();

    if total <= 0.0 {
        return Ok(vec![1.0 / num_classes as f32; num_classes]);
    }

    Ok(scores.into_iter().map(|score| score / total).collect())
}

/// Loader that never reads the artifact and counts every load.
pub struct ModelLoaderFake {
    default_output: FakeOutput,
    outputs: HashMap<PathBuf, FakeOutput>,
    failing_paths: Vec<PathBuf>,
    load_delay: Duration,
    load_count: AtomicUsize,
}

impl ModelLoaderFake {
    pub fn new(default_output: FakeOutput) -> Self {
        Self {
            default_output,
            outputs: HashMap::new(),
            failing_paths: Vec::new(),
            load_delay: Duration::ZERO,
            load_count: AtomicUsize::new(0),
        }
    }

    #[cfg(test)]
    pub fn with_output_for(mut self, path: impl Into<PathBuf>, output: FakeOutput) -> Self {
        self.outputs.insert(path.into(), output);
        self
    }

    #[cfg(test)]
    pub fn with_failing_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing_paths.push(path.into());
        self
    }

    #[cfg(test)]
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    #[cfg(test)]
    pub fn load_count(&self) -> usize {
        self.load_count.load(Ordering::SeqCst)
    }
}

impl ModelLoader for ModelLoaderFake {
    fn load(&self, path: &Path) -> Result<Arc<dyn Model>, BoxError> {
        self.load_count.fetch_add(1, Ordering::SeqCst);

        if !self.load_delay.is_zero() {
            std::thread::sleep(self.load_delay);
        }

        if self.failing_paths.iter().any(|failing| failing == path) {
            return Err(format!("corrupted artifact: {}", path.display()).into());
        }

        let output = self
            .outputs
            .get(path)
            .cloned()
            .unwrap_or_else(|| self.default_output.clone());

        Ok(Arc::new(ModelFake::new(output)))
    }
}
