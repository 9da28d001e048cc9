//! Feature Engineering Engine
//!
//! Computes the 34-element feature vector the linear classifier is trained on.
//! Feature order is fixed by [`Feature::ALL`]; model weights are indexed against it.

mod features;
mod schema;
mod statistics;

pub use features::{FeatureExtractor, FeatureVector};
pub use schema::{Feature, Stat, FEATURE_DIMENSION};
pub use statistics::{AxisStats, RunningStats};

use ring_buffer::WindowError;
use thiserror::Error;

/// Errors during feature extraction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeatureError {
    #[error("Cannot extract features: {0}")]
    NotReady(#[from] WindowError),
    #[error("Window capacity mismatch: expected {expected}, got {actual}")]
    CapacityMismatch { expected: usize, actual: usize },
    #[error("Cannot extract features from an empty sample set")]
    EmptyWindow,
}
