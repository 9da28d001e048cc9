//! Conditioner Error Types

use thiserror::Error;

/// Errors raised while configuring the conditioner
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionerError {
    /// Smoothing constant must lie strictly inside (0, 1)
    #[error("Smoothing constant {0} is outside the open interval (0, 1)")]
    InvalidAlpha(f32),
}
