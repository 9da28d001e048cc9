//! Exponential Moving Average Conditioning

use crate::error::ConditionerError;
use crate::sample::{magnitude, ConditionedSample, ImuReading, Mount, RawSample};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Reference smoothing constant (lower = more smoothing)
pub const DEFAULT_ALPHA: f32 = 0.1;

/// Conditioner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConditionerConfig {
    /// EMA smoothing constant, strictly inside (0, 1)
    pub alpha: f32,
}

impl Default for ConditionerConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// First-order exponential moving average over a single channel
#[derive(Debug, Clone, Copy)]
pub struct Ema {
    alpha: f32,
    state: f32,
}

impl Ema {
    /// Create a filter starting from zero
    pub fn new(alpha: f32) -> Self {
        Self { alpha, state: 0.0 }
    }

    /// Feed a raw value and return the updated state
    pub fn update(&mut self, raw: f32) -> f32 {
        self.state = self.alpha * raw + (1.0 - self.alpha) * self.state;
        self.state
    }

    /// Current smoothed value
    pub fn value(&self) -> f32 {
        self.state
    }
}

/// Smooths acceleration axes of both sensors, passing gyroscope axes through.
///
/// State lives for the lifetime of the conditioner and starts at zero.
#[derive(Debug, Clone)]
pub struct SignalConditioner {
    alpha: f32,
    /// Acceleration filters indexed by mount, then axis
    filters: [[Ema; 3]; 2],
    samples_seen: u64,
}

impl SignalConditioner {
    /// Create a conditioner, rejecting smoothing constants outside (0, 1)
    pub fn new(config: &ConditionerConfig) -> Result<Self, ConditionerError> {
        let alpha = config.alpha;
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ConditionerError::InvalidAlpha(alpha));
        }
        debug!("Creating signal conditioner: alpha={}", alpha);

        Ok(Self {
            alpha,
            filters: [[Ema::new(alpha); 3]; 2],
            samples_seen: 0,
        })
    }

    /// Condition one raw sample
    pub fn condition(&mut self, raw: &RawSample) -> ConditionedSample {
        let front = self.smooth(Mount::Front, &raw.front);
        let rear = self.smooth(Mount::Rear, &raw.rear);
        self.samples_seen += 1;

        ConditionedSample {
            timestamp_ms: raw.timestamp_ms,
            front_magnitude: magnitude(front.accel),
            rear_magnitude: magnitude(rear.accel),
            front,
            rear,
        }
    }

    fn smooth(&mut self, mount: Mount, reading: &ImuReading) -> ImuReading {
        let filters = &mut self.filters[mount as usize];
        let mut accel = [0.0; 3];
        for (out, (filter, &raw)) in accel.iter_mut().zip(filters.iter_mut().zip(&reading.accel)) {
            *out = filter.update(raw);
        }
        ImuReading {
            accel,
            gyro: reading.gyro,
        }
    }

    /// Current smoothed acceleration for a mount
    pub fn state(&self, mount: Mount) -> [f32; 3] {
        self.filters[mount as usize].map(|f| f.value())
    }

    /// Smoothing constant in use
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Number of samples conditioned so far
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }
}

impl Default for SignalConditioner {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            filters: [[Ema::new(DEFAULT_ALPHA); 3]; 2],
            samples_seen: 0,
        }
    }
}
