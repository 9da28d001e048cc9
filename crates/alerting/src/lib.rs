//! Alerting System
//!
//! Enforces the minimum interval between accepted detections and numbers the
//! events that get through.

mod gate;

pub use gate::{ConsiderDecision, DetectionEvent, EventGate, GateConfig, GateOutcome, GateState};
