//! Detection Reporting
//!
//! Consumes accepted detections from the sampling loop's queue and hands them to
//! report sinks:
//! - JSON payload with the window in chronological order
//! - Location notifications under a per-session budget
//!
//! Transport (HTTP, SMTP, MQTT, ...) lives behind [`ReportSink`].

mod notification;
mod payload;
mod reporter;
mod sink;

pub use notification::{maps_link, Notification, NotificationBudget};
pub use payload::{DetectionReport, SamplePayload};
pub use reporter::{Reporter, ReporterSummary, ReportingConfig};
pub use sink::{LogSink, ReportSink};

use thiserror::Error;

/// Reporting error types
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Sink unavailable: {0}")]
    Sink(String),
}
