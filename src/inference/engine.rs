use crate::config::Config;
use crate::error::Error;
use crate::inference::prediction::{ClassScore, PredictionResult};
use crate::inference::ranking::{argmax, top_k_indices};
use crate::model::interface::Model;
use tract_onnx::prelude::tract_ndarray::Array4;

pub struct InferenceEngine {
    class_labels: Vec<String>,
    input_shape: [usize; 4],
    top_k: usize,
}

impl InferenceEngine {
    pub fn new(class_labels: Vec<String>, input_shape: [usize; 4], top_k: usize) -> Self {
        Self {
            class_labels,
            input_shape,
            top_k,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.class_labels.clone(), config.input_shape(), config.top_k)
    }

    pub fn predict(&self, model: &dyn Model, tensor: &Array4<f32>) -> Result<PredictionResult, Error> {
        if tensor.shape() != self.input_shape {
            return Err(Error::ShapeMismatch {
                expected: self.input_shape.to_vec(),
                actual: tensor.shape().to_vec(),
            });
        }

        let scores = model.predict(tensor).map_err(Error::Inference)?;

        self.rank(&scores)
    }

    /// Builds a result from raw model scores without re-normalizing them.
    pub fn rank(&self, scores: &[f32]) -> Result<PredictionResult, Error> {
        if scores.len() != self.class_labels.len() {
            return Err(Error::inference(format!(
                "model returned {} scores for {} class labels",
                scores.len(),
                self.class_labels.len()
            )));
        }

        if let Some(index) = scores.iter().position(|score| !score.is_finite()) {
            return Err(Error::inference(format!(
                "model returned non-finite score {} for '{}'",
                scores[index], self.class_labels[index]
            )));
        }

        let probabilities: Vec<ClassScore> = scores
            .iter()
            .zip(&self.class_labels)
            .enumerate()
            .map(|(index, (&probability, label))| ClassScore {
                index,
                label: label.clone(),
                probability,
            })
            .collect();

        let best = argmax(scores)
            .map(|index| probabilities[index].clone())
            .ok_or_else(|| Error::inference("no class labels configured"))?;

        let top_k = top_k_indices(scores, self.top_k)
            .into_iter()
            .map(|index| probabilities[index].clone())
            .collect();

        Ok(PredictionResult {
            label: best.label,
            index: best.index,
            confidence: best.probability,
            probabilities,
            top_k,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::model::impl_fake::{FakeOutput, ModelFake};

    fn engine() -> InferenceEngine {
        InferenceEngine::from_config(&Config::default())
    }

    fn input() -> Array4<f32> {
        Array4::zeros((1, 224, 224, 3))
    }

    #[test]
    fn test_predict_ranks_flower_scores() {
        let model = ModelFake::new(FakeOutput::Fixed(vec![0.05, 0.10, 0.55, 0.20, 0.10]));

        let result = engine().predict(&model, &input()).unwrap();

        assert_eq!(result.index, 2);
        assert_eq!(result.label, "rose");
        assert_eq!(result.confidence, 0.55);

        let top: Vec<(usize, f32)> = result.top_k.iter().map(|s| (s.index, s.probability)).collect();
        assert_eq!(top, vec![(2, 0.55), (3, 0.20), (1, 0.10)]);

        assert_eq!(result.top_k[0].label, result.label);
        assert_eq!(result.top_k[0].probability, result.confidence);
    }

    #[test]
    fn test_probabilities_are_raw_and_in_label_order() {
        let scores = vec![0.2, 0.2, 0.2, 0.2, 0.3];
        let model = ModelFake::new(FakeOutput::Fixed(scores.clone()));

        let result = engine().predict(&model, &input()).unwrap();

        let labels: Vec<&str> = result.probabilities.iter().map(|s| s.label.as_str()).collect();
        let values: Vec<f32> = result.probabilities.iter().map(|s| s.probability).collect();
        assert_eq!(labels, vec!["daisy", "dandelion", "rose", "sunflower", "tulip"]);
        assert_eq!(values, scores);
    }

    #[test]
    fn test_wrong_input_shape_is_rejected() {
        let model = ModelFake::new(FakeOutput::Fixed(vec![0.2; 5]));
        let tensor = Array4::zeros((1, 3, 224, 224));

        let error = engine().predict(&model, &tensor).unwrap_err();

        match error {
            Error::ShapeMismatch { expected, actual } => {
                assert_eq!(expected, vec![1, 224, 224, 3]);
                assert_eq!(actual, vec![1, 3, 224, 224]);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_model_failure_surfaces_cause() {
        let model = ModelFake::new(FakeOutput::Fail("weights corrupted".to_string()));

        let error = engine().predict(&model, &input()).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Inference);
        assert!(error.to_string().contains("weights corrupted"));
    }

    #[test]
    fn test_wrong_output_length_is_inference_error() {
        let model = ModelFake::new(FakeOutput::Fixed(vec![0.5, 0.5]));

        let error = engine().predict(&model, &input()).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Inference);
    }

    #[test]
    fn test_nan_score_is_inference_error() {
        let error = engine().rank(&[0.1, f32::NAN, 0.2, 0.3, 0.4]).unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Inference);
        assert!(error.to_string().contains("dandelion"));
    }

    #[test]
    fn test_equal_scores_rank_by_label_order() {
        let result = engine().rank(&[0.0, -0.0, 0.0, 0.5, 0.5]).unwrap();

        assert_eq!(result.index, 3);
        let top: Vec<usize> = result.top_k.iter().map(|s| s.index).collect();
        assert_eq!(top, vec![3, 4, 0]);
    }

    #[test]
    fn test_top_k_shorter_than_label_set() {
        let engine = InferenceEngine::new(vec!["a".to_string(), "b".to_string()], [1, 2, 2, 3], 3);

        let result = engine.rank(&[0.4, 0.6]).unwrap();

        assert_eq!(result.top_k.len(), 2);
        assert_eq!(result.label, "b");
    }
}
