//! Collaborator Seams

use crate::PipelineError;
use serde::{Deserialize, Serialize};
use signal_conditioner::RawSample;

/// Last known position from the positioning collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
}

/// Supplies one dual-sensor sample per tick.
///
/// Reads are expected not to block. `Ok(None)` ends the stream.
pub trait SensorSource {
    fn read(&mut self) -> Result<Option<RawSample>, PipelineError>;
}

/// Supplies position updates; polled once per tick
pub trait LocationSource {
    /// New fix since the last poll, if any
    fn poll(&mut self) -> Option<GeoFix>;
}

/// Location source that never produces a fix
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocation;

impl LocationSource for NoLocation {
    fn poll(&mut self) -> Option<GeoFix> {
        None
    }
}

/// Sensor source over any iterator of samples
pub struct IterSource<I> {
    samples: I,
}

impl<I: Iterator<Item = RawSample>> IterSource<I> {
    pub fn new(samples: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            samples: samples.into_iter(),
        }
    }
}

impl<I: Iterator<Item = RawSample>> SensorSource for IterSource<I> {
    fn read(&mut self) -> Result<Option<RawSample>, PipelineError> {
        Ok(self.samples.next())
    }
}

/// Location source that reports one fixed position on its first poll
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation {
    fix: Option<GeoFix>,
}

impl FixedLocation {
    pub fn new(fix: GeoFix) -> Self {
        Self { fix: Some(fix) }
    }
}

impl From<Option<GeoFix>> for FixedLocation {
    fn from(fix: Option<GeoFix>) -> Self {
        Self { fix }
    }
}

impl LocationSource for FixedLocation {
    fn poll(&mut self) -> Option<GeoFix> {
        self.fix.take()
    }
}
