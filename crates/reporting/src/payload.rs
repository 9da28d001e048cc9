//! Report Payload

use chrono::{DateTime, Utc};
use sampling_loop::Detection;
use serde::{Deserialize, Serialize};
use signal_conditioner::ConditionedSample;
use uuid::Uuid;

/// One window sample in upload form
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePayload {
    pub acc_x1: f32,
    pub acc_y1: f32,
    pub acc_z1: f32,
    pub acc_x2: f32,
    pub acc_y2: f32,
    pub acc_z2: f32,
    pub gyr_x1: f32,
    pub gyr_y1: f32,
    pub gyr_z1: f32,
    pub gyr_x2: f32,
    pub gyr_y2: f32,
    pub gyr_z2: f32,
}

impl From<&ConditionedSample> for SamplePayload {
    fn from(s: &ConditionedSample) -> Self {
        let [acc_x1, acc_y1, acc_z1] = s.front.accel;
        let [acc_x2, acc_y2, acc_z2] = s.rear.accel;
        let [gyr_x1, gyr_y1, gyr_z1] = s.front.gyro;
        let [gyr_x2, gyr_y2, gyr_z2] = s.rear.gyro;
        Self {
            acc_x1,
            acc_y1,
            acc_z1,
            acc_x2,
            acc_y2,
            acc_z2,
            gyr_x1,
            gyr_y1,
            gyr_z1,
            gyr_x2,
            gyr_y2,
            gyr_z2,
        }
    }
}

/// Serialized detection handed to report sinks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionReport {
    pub report_id: Uuid,
    /// Detection sequence number
    pub count: u64,
    /// Acceptance time on the loop clock (ms)
    pub accepted_at_ms: u64,
    pub reported_at: DateTime<Utc>,
    pub score: f32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Window samples, oldest first
    pub accelerometer_data: Vec<SamplePayload>,
}

impl DetectionReport {
    pub fn from_detection(detection: &Detection) -> Self {
        Self {
            report_id: Uuid::new_v4(),
            count: detection.event.sequence,
            accepted_at_ms: detection.event.accepted_at_ms,
            reported_at: Utc::now(),
            score: detection.score,
            latitude: detection.location.map(|fix| fix.latitude),
            longitude: detection.location.map(|fix| fix.longitude),
            accelerometer_data: detection.window.iter().map(SamplePayload::from).collect(),
        }
    }

    /// JSON body for upload
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}
