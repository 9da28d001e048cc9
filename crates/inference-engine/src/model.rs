//! Classifier Model Artifact

use crate::ModelError;
use feature_engine::FEATURE_DIMENSION;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// On-disk JSON form of the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub weights: Vec<f32>,
    pub bias: f32,
    pub threshold: f32,
}

/// Immutable linear model: one weight per feature, a bias and a decision threshold
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierModel {
    weights: [f32; FEATURE_DIMENSION],
    bias: f32,
    threshold: f32,
}

impl ClassifierModel {
    /// Build a model, checking the weight count against the feature schema
    pub fn from_parts(weights: &[f32], bias: f32, threshold: f32) -> Result<Self, ModelError> {
        let weights: [f32; FEATURE_DIMENSION] =
            weights.try_into().map_err(|_| ModelError::SchemaMismatch {
                expected: FEATURE_DIMENSION,
                actual: weights.len(),
            })?;

        if weights.iter().any(|w| !w.is_finite()) {
            return Err(ModelError::NonFinite("weight"));
        }
        if !bias.is_finite() {
            return Err(ModelError::NonFinite("bias"));
        }
        if !threshold.is_finite() {
            return Err(ModelError::NonFinite("threshold"));
        }

        Ok(Self {
            weights,
            bias,
            threshold,
        })
    }

    /// Model with all weights zero; the decision reduces to `bias > threshold`
    pub fn constant(bias: f32, threshold: f32) -> Self {
        Self {
            weights: [0.0; FEATURE_DIMENSION],
            bias,
            threshold,
        }
    }

    /// Parse the JSON artifact form
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let artifact: ModelArtifact =
            serde_json::from_str(json).map_err(|e| ModelError::Parse(e.to_string()))?;
        Self::try_from(artifact)
    }

    /// Parse the raw little-endian f32 layout: weights followed by the bias.
    ///
    /// The raw layout carries no threshold, so it is supplied by the caller.
    pub fn from_raw_bytes(bytes: &[u8], threshold: f32) -> Result<Self, ModelError> {
        if bytes.len() % 4 != 0 {
            return Err(ModelError::Parse(format!(
                "raw model length {} is not a multiple of 4",
                bytes.len()
            )));
        }
        let values: Vec<f32> = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();

        match values.split_last() {
            Some((&bias, weights)) => Self::from_parts(weights, bias, threshold),
            None => Err(ModelError::SchemaMismatch {
                expected: FEATURE_DIMENSION,
                actual: 0,
            }),
        }
    }

    /// Load a model from disk.
    ///
    /// Files ending in `.bin` use the raw layout with `raw_threshold`;
    /// anything else is read as JSON.
    pub fn load(path: impl AsRef<Path>, raw_threshold: f32) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let model = if path.extension().is_some_and(|ext| ext == "bin") {
            Self::from_raw_bytes(&std::fs::read(path)?, raw_threshold)?
        } else {
            Self::from_json_str(&std::fs::read_to_string(path)?)?
        };

        info!(
            "Loaded classifier model from {} (bias={}, threshold={})",
            path.display(),
            model.bias,
            model.threshold
        );
        Ok(model)
    }

    pub fn weights(&self) -> &[f32; FEATURE_DIMENSION] {
        &self.weights
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl TryFrom<ModelArtifact> for ClassifierModel {
    type Error = ModelError;

    fn try_from(artifact: ModelArtifact) -> Result<Self, Self::Error> {
        Self::from_parts(&artifact.weights, artifact.bias, artifact.threshold)
    }
}

impl From<&ClassifierModel> for ModelArtifact {
    fn from(model: &ClassifierModel) -> Self {
        Self {
            weights: model.weights.to_vec(),
            bias: model.bias,
            threshold: model.threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn weights(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32 * 0.01).collect()
    }

    #[test]
    fn test_schema_mismatch() {
        let err = ClassifierModel::from_parts(&weights(33), 0.0, 0.0).unwrap_err();
        assert!(matches!(
            err,
            ModelError::SchemaMismatch {
                expected: 34,
                actual: 33
            }
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let mut w = weights(FEATURE_DIMENSION);
        w[5] = f32::NAN;
        assert!(matches!(
            ClassifierModel::from_parts(&w, 0.0, 0.0),
            Err(ModelError::NonFinite("weight"))
        ));
        assert!(matches!(
            ClassifierModel::from_parts(&weights(FEATURE_DIMENSION), 0.0, f32::INFINITY),
            Err(ModelError::NonFinite("threshold"))
        ));
    }

    #[test]
    fn test_json_artifact() {
        let artifact = ModelArtifact {
            weights: weights(FEATURE_DIMENSION),
            bias: -0.5,
            threshold: 0.25,
        };
        let json = serde_json::to_string(&artifact).unwrap();
        let model = ClassifierModel::from_json_str(&json).unwrap();

        assert_eq!(model.bias(), -0.5);
        assert_eq!(model.threshold(), 0.25);
        assert_eq!(model.weights().as_slice(), artifact.weights.as_slice());
    }

    #[test]
    fn test_json_parse_error() {
        assert!(matches!(
            ClassifierModel::from_json_str("{\"weights\": [1.0]"),
            Err(ModelError::Parse(_))
        ));
    }

    #[test]
    fn test_raw_layout() {
        let mut bytes: Vec<u8> = weights(FEATURE_DIMENSION)
            .iter()
            .flat_map(|w| w.to_le_bytes())
            .collect();
        bytes.extend_from_slice(&1.5f32.to_le_bytes());

        let model = ClassifierModel::from_raw_bytes(&bytes, 0.0).unwrap();
        assert_eq!(model.bias(), 1.5);
        assert_eq!(model.weights()[1], 0.01);

        assert!(matches!(
            ClassifierModel::from_raw_bytes(&bytes[..bytes.len() - 1], 0.0),
            Err(ModelError::Parse(_))
        ));
        assert!(matches!(
            ClassifierModel::from_raw_bytes(&[], 0.0),
            Err(ModelError::SchemaMismatch { actual: 0, .. })
        ));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("model.json");
        let artifact = ModelArtifact::from(&ClassifierModel::constant(0.1, 0.2));
        std::fs::write(&json_path, serde_json::to_vec(&artifact).unwrap()).unwrap();
        assert_eq!(
            ClassifierModel::load(&json_path, 0.0).unwrap(),
            ClassifierModel::constant(0.1, 0.2)
        );

        let bin_path = dir.path().join("model.bin");
        let mut file = std::fs::File::create(&bin_path).unwrap();
        for _ in 0..FEATURE_DIMENSION {
            file.write_all(&0f32.to_le_bytes()).unwrap();
        }
        file.write_all(&(-1f32).to_le_bytes()).unwrap();
        drop(file);
        assert_eq!(
            ClassifierModel::load(&bin_path, 0.5).unwrap(),
            ClassifierModel::constant(-1.0, 0.5)
        );

        assert!(matches!(
            ClassifierModel::load(dir.path().join("missing.json"), 0.0),
            Err(ModelError::Io(_))
        ));
    }
}
