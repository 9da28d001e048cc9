//! Signal Conditioning
//!
//! Sample types for the front/rear inertial sensor pair and the exponential
//! smoothing stage that turns raw readings into conditioned window samples.

mod conditioner;
mod error;
mod sample;

pub use conditioner::{ConditionerConfig, Ema, SignalConditioner, DEFAULT_ALPHA};
pub use error::ConditionerError;
pub use sample::{magnitude, Axis, ConditionedSample, ImuReading, Mount, RawSample};
