//! Dual-IMU Sample Types

use serde::{Deserialize, Serialize};

/// Axis of a three-axis measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in storage order
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis inside a `[f32; 3]`
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }
}

/// Mounting position of an inertial sensor on the vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mount {
    /// Sensor near the front axle
    Front,
    /// Sensor near the rear axle
    Rear,
}

impl Mount {
    /// Both mounts, front first
    pub const ALL: [Mount; 2] = [Mount::Front, Mount::Rear];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Mount::Front => "front",
            Mount::Rear => "rear",
        }
    }

    /// Channel suffix used in field names (`acc_x1`, `gyr_z2`, ...)
    pub fn channel(&self) -> u8 {
        match self {
            Mount::Front => 1,
            Mount::Rear => 2,
        }
    }
}

/// One 6-axis reading from a single sensor
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImuReading {
    /// Linear acceleration (m/s²), indexed by [`Axis::index`]
    pub accel: [f32; 3],
    /// Angular rate (rad/s), indexed by [`Axis::index`]
    pub gyro: [f32; 3],
}

impl ImuReading {
    pub fn new(accel: [f32; 3], gyro: [f32; 3]) -> Self {
        Self { accel, gyro }
    }

    pub fn accel(&self, axis: Axis) -> f32 {
        self.accel[axis.index()]
    }

    pub fn gyro(&self, axis: Axis) -> f32 {
        self.gyro[axis.index()]
    }
}

/// Readings captured from both sensors during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    /// Capture time (ms since loop start)
    #[serde(default)]
    pub timestamp_ms: u64,
    pub front: ImuReading,
    pub rear: ImuReading,
}

impl RawSample {
    pub fn new(timestamp_ms: u64, front: ImuReading, rear: ImuReading) -> Self {
        Self {
            timestamp_ms,
            front,
            rear,
        }
    }

    /// Reading for the given mount
    pub fn reading(&self, mount: Mount) -> &ImuReading {
        match mount {
            Mount::Front => &self.front,
            Mount::Rear => &self.rear,
        }
    }
}

/// Sample stored in the sliding window.
///
/// Acceleration axes hold smoothed values, gyroscope axes hold the raw rates.
/// Each mount also carries the Euclidean norm of its smoothed acceleration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConditionedSample {
    pub timestamp_ms: u64,
    pub front: ImuReading,
    pub rear: ImuReading,
    pub front_magnitude: f32,
    pub rear_magnitude: f32,
}

impl ConditionedSample {
    /// Reading for the given mount
    pub fn reading(&self, mount: Mount) -> &ImuReading {
        match mount {
            Mount::Front => &self.front,
            Mount::Rear => &self.rear,
        }
    }

    /// Smoothed acceleration on one axis
    pub fn accel(&self, mount: Mount, axis: Axis) -> f32 {
        self.reading(mount).accel(axis)
    }

    /// Angular rate on one axis
    pub fn gyro(&self, mount: Mount, axis: Axis) -> f32 {
        self.reading(mount).gyro(axis)
    }

    /// Smoothed acceleration magnitude
    pub fn magnitude(&self, mount: Mount) -> f32 {
        match mount {
            Mount::Front => self.front_magnitude,
            Mount::Rear => self.rear_magnitude,
        }
    }
}

/// Euclidean norm of a three-axis vector
pub fn magnitude(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}
