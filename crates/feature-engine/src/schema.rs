//! Feature Schema
//!
//! Layout (34 values):
//! - front acceleration x/y/z, each {min, max, mean, std}   -> 0..12
//! - rear acceleration x/y/z, each {min, max, mean, std}    -> 12..24
//! - magnitude max front/rear, magnitude std front/rear     -> 24..28
//! - front gyroscope std x/y/z                              -> 28..31
//! - rear gyroscope std x/y/z                               -> 31..34

use signal_conditioner::{Axis, Mount};

/// Number of features in the vector
pub const FEATURE_DIMENSION: usize = 34;

/// Per-axis acceleration statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Min,
    Max,
    Mean,
    StdDev,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Min, Stat::Max, Stat::Mean, Stat::StdDev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Min => "min",
            Stat::Max => "max",
            Stat::Mean => "mean",
            Stat::StdDev => "std",
        }
    }
}

/// One slot of the feature vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Smoothed acceleration statistic for one mount and axis
    Accel { mount: Mount, axis: Axis, stat: Stat },
    /// Largest acceleration magnitude in the window
    MagnitudeMax(Mount),
    /// Population std of the acceleration magnitude
    MagnitudeStd(Mount),
    /// Population std of the angular rate on one axis
    GyroStd { mount: Mount, axis: Axis },
}

impl Feature {
    /// Every feature in vector order
    pub const ALL: [Feature; FEATURE_DIMENSION] = build_schema();

    /// Position of this feature in the vector
    pub const fn index(self) -> usize {
        match self {
            Feature::Accel { mount, axis, stat } => {
                mount as usize * 12 + axis as usize * 4 + stat as usize
            }
            Feature::MagnitudeMax(mount) => 24 + mount as usize,
            Feature::MagnitudeStd(mount) => 26 + mount as usize,
            Feature::GyroStd { mount, axis } => 28 + mount as usize * 3 + axis as usize,
        }
    }

    /// Column name, e.g. `acc_z1_std` or `gyr_x2_std`
    pub fn name(&self) -> String {
        match self {
            Feature::Accel { mount, axis, stat } => {
                format!("acc_{}{}_{}", axis.as_str(), mount.channel(), stat.as_str())
            }
            Feature::MagnitudeMax(mount) => format!("acc_mag{}_max", mount.channel()),
            Feature::MagnitudeStd(mount) => format!("acc_mag{}_std", mount.channel()),
            Feature::GyroStd { mount, axis } => {
                format!("gyr_{}{}_std", axis.as_str(), mount.channel())
            }
        }
    }
}

const fn build_schema() -> [Feature; FEATURE_DIMENSION] {
    let mut schema = [Feature::MagnitudeMax(Mount::Front); FEATURE_DIMENSION];
    let mut idx = 0;

    let mut m = 0;
    while m < 2 {
        let mut a = 0;
        while a < 3 {
            let mut s = 0;
            while s < 4 {
                schema[idx] = Feature::Accel {
                    mount: Mount::ALL[m],
                    axis: Axis::ALL[a],
                    stat: Stat::ALL[s],
                };
                idx += 1;
                s += 1;
            }
            a += 1;
        }
        m += 1;
    }

    schema[idx] = Feature::MagnitudeMax(Mount::Front);
    schema[idx + 1] = Feature::MagnitudeMax(Mount::Rear);
    schema[idx + 2] = Feature::MagnitudeStd(Mount::Front);
    schema[idx + 3] = Feature::MagnitudeStd(Mount::Rear);
    idx += 4;

    let mut m = 0;
    while m < 2 {
        let mut a = 0;
        while a < 3 {
            schema[idx] = Feature::GyroStd {
                mount: Mount::ALL[m],
                axis: Axis::ALL[a],
            };
            idx += 1;
            a += 1;
        }
        m += 1;
    }

    schema
}
