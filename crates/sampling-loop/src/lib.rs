//! Sampling Loop
//!
//! Drives one tick per sample period: condition both sensors, insert into the
//! window, and run feature extraction, classification and gating when allowed.
//! Accepted detections leave through a bounded queue so reporting never stalls
//! sampling.

mod context;
mod driver;
mod source;
mod status;

pub use context::{Detection, PipelineConfig, PipelineContext, TickOutcome};
pub use driver::{LoopConfig, LoopSummary, SamplingLoop};
pub use source::{FixedLocation, GeoFix, IterSource, LocationSource, NoLocation, SensorSource};
pub use status::StatusReport;

use thiserror::Error;

/// Errors raised by the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid conditioner configuration: {0}")]
    Conditioner(#[from] signal_conditioner::ConditionerError),
    #[error("Window error: {0}")]
    Window(#[from] ring_buffer::WindowError),
    #[error("Feature extraction failed: {0}")]
    Feature(#[from] feature_engine::FeatureError),
    #[error("Model error: {0}")]
    Model(#[from] inference_engine::ModelError),
    #[error("Sensor unavailable: {0}")]
    SensorUnavailable(String),
    #[error("Report queue closed")]
    ReportQueueClosed,
}
