//! Linear Classification

use crate::model::ClassifierModel;
use feature_engine::FeatureVector;
use tracing::debug;

/// Outcome of one classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    /// `bias + Σ weight[i]·feature[i]`
    pub score: f32,
    /// Threshold the score was compared against
    pub threshold: f32,
    /// Whether `score > threshold`
    pub positive: bool,
}

/// Stateless linear classifier over the fixed feature schema
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    model: ClassifierModel,
}

impl LinearClassifier {
    pub fn new(model: ClassifierModel) -> Self {
        Self { model }
    }

    /// Decision value for a feature vector
    pub fn score(&self, features: &FeatureVector) -> f32 {
        self.model
            .weights()
            .iter()
            .zip(features.values())
            .fold(self.model.bias(), |acc, (w, x)| acc + w * x)
    }

    /// Binary decision: `score > threshold`
    pub fn classify(&self, features: &FeatureVector) -> bool {
        self.evaluate(features).positive
    }

    /// Score and decision together
    pub fn evaluate(&self, features: &FeatureVector) -> Decision {
        let score = self.score(features);
        let threshold = self.model.threshold();
        let positive = score > threshold;
        debug!("Classifier score {:.4} (threshold {:.4}) -> {}", score, threshold, positive);

        Decision {
            score,
            threshold,
            positive,
        }
    }

    pub fn model(&self) -> &ClassifierModel {
        &self.model
    }
}
