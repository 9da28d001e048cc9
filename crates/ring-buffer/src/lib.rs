//! Sliding Window Buffer
//!
//! Fixed-capacity circular store that overwrites its oldest slot and reports
//! when it has wrapped for the first time.

mod buffer;

pub use buffer::{SlidingWindow, WINDOW_SIZE};

use thiserror::Error;

/// Errors when reading the window
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    #[error("Window not ready: {inserted} of {capacity} samples inserted")]
    NotReady { inserted: usize, capacity: usize },
    #[error("Window capacity must be greater than zero")]
    ZeroCapacity,
}
