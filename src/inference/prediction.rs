#[derive(Debug, Clone, PartialEq)]
pub struct ClassScore {
    pub index: usize,
    pub label: String,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub label: String,
    pub index: usize,
    /// Probability of the predicted class.
    pub confidence: f32,
    /// One score per class label, in label order. Raw model output.
    pub probabilities: Vec<ClassScore>,
    /// Highest first; equal scores keep label order.
    pub top_k: Vec<ClassScore>,
}
