//! Linear Inference Engine
//!
//! Loads the precomputed weight/bias/threshold artifact and applies it to
//! feature vectors.

mod classifier;
mod model;

pub use classifier::{Decision, LinearClassifier};
pub use model::{ClassifierModel, ModelArtifact};

use thiserror::Error;

/// Errors while loading the classifier model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model schema mismatch: expected {expected} weights, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },
    #[error("Model contains a non-finite {0}")]
    NonFinite(&'static str),
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse model artifact: {0}")]
    Parse(String),
}
