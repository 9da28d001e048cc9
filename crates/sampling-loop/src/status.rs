//! Periodic Status Report

use crate::source::GeoFix;
use serde::Serialize;
use std::fmt;

/// Once-per-interval diagnostic snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusReport {
    pub uptime_ms: u64,
    /// Unsmoothed vertical acceleration from the current tick
    pub front_accel_z: f32,
    pub rear_accel_z: f32,
    /// Magnitudes of the latest written window slot
    pub front_magnitude: f32,
    pub rear_magnitude: f32,
    pub detections: u64,
    pub window_filled: bool,
    pub location: Option<GeoFix>,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Front: {:.2} | Rear: {:.2} | Mag1: {:.2} | Mag2: {:.2} | Potholes: {}",
            self.front_accel_z,
            self.rear_accel_z,
            self.front_magnitude,
            self.rear_magnitude,
            self.detections
        )?;
        match self.location {
            Some(fix) => write!(f, " | GPS: {:.6}, {:.6}", fix.latitude, fix.longitude),
            None => write!(f, " | GPS: Waiting for fix"),
        }
    }
}
