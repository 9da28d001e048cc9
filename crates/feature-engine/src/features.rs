//! Feature Vector Assembly

use crate::schema::{Feature, Stat, FEATURE_DIMENSION};
use crate::statistics::RunningStats;
use crate::FeatureError;
use ring_buffer::{SlidingWindow, WINDOW_SIZE};
use signal_conditioner::{Axis, ConditionedSample, Mount};
use tracing::trace;

/// Feature vector for classification, laid out by [`Feature::ALL`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f32; FEATURE_DIMENSION],
}

impl FeatureVector {
    pub fn new(values: [f32; FEATURE_DIMENSION]) -> Self {
        Self { values }
    }

    /// Value of a single feature
    pub fn get(&self, feature: Feature) -> f32 {
        self.values[feature.index()]
    }

    pub fn values(&self) -> &[f32; FEATURE_DIMENSION] {
        &self.values
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Features paired with their column names
    pub fn named(&self) -> impl Iterator<Item = (String, f32)> + '_ {
        Feature::ALL.iter().map(|f| (f.name(), self.get(*f)))
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new([0.0; FEATURE_DIMENSION])
    }
}

/// Accumulators for every statistic group over one window
#[derive(Default)]
struct WindowAccumulator {
    accel: [[RunningStats; 3]; 2],
    magnitude: [RunningStats; 2],
    gyro: [[RunningStats; 3]; 2],
}

impl WindowAccumulator {
    fn push(&mut self, sample: &ConditionedSample) {
        for mount in Mount::ALL {
            let m = mount as usize;
            let reading = sample.reading(mount);
            for axis in Axis::ALL {
                self.accel[m][axis.index()].push(reading.accel(axis));
                self.gyro[m][axis.index()].push(reading.gyro(axis));
            }
            self.magnitude[m].push(sample.magnitude(mount));
        }
    }

    fn value(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Accel { mount, axis, stat } => {
                let stats = &self.accel[mount as usize][axis.index()];
                match stat {
                    Stat::Min => stats.min(),
                    Stat::Max => stats.max(),
                    Stat::Mean => stats.mean(),
                    Stat::StdDev => stats.std_dev(),
                }
            }
            Feature::MagnitudeMax(mount) => self.magnitude[mount as usize].max(),
            Feature::MagnitudeStd(mount) => self.magnitude[mount as usize].std_dev(),
            Feature::GyroStd { mount, axis } => self.gyro[mount as usize][axis.index()].std_dev(),
        }
    }
}

/// Feature extractor over the conditioned-sample window.
///
/// Reads the window without mutating it; all statistics are order-independent.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    window_size: usize,
}

impl FeatureExtractor {
    /// Create an extractor expecting windows of `window_size` samples
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Extract features from a filled window
    pub fn extract(
        &self,
        window: &SlidingWindow<ConditionedSample>,
    ) -> Result<FeatureVector, FeatureError> {
        if window.capacity() != self.window_size {
            return Err(FeatureError::CapacityMismatch {
                expected: self.window_size,
                actual: window.capacity(),
            });
        }
        let samples = window.snapshot()?;
        self.extract_from_samples(samples)
    }

    /// Extract features from a slice of samples directly
    pub fn extract_from_samples(
        &self,
        samples: &[ConditionedSample],
    ) -> Result<FeatureVector, FeatureError> {
        if samples.is_empty() {
            return Err(FeatureError::EmptyWindow);
        }

        let mut acc = WindowAccumulator::default();
        for sample in samples {
            acc.push(sample);
        }

        let mut values = [0.0f32; FEATURE_DIMENSION];
        for feature in Feature::ALL {
            values[feature.index()] = acc.value(feature) as f32;
        }

        trace!("Extracted {} features from {} samples", FEATURE_DIMENSION, samples.len());
        Ok(FeatureVector::new(values))
    }

    /// Expected window size
    pub fn window_size(&self) -> usize {
        self.window_size
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use signal_conditioner::{magnitude, ImuReading};

    fn sample(front_accel: [f32; 3], rear_accel: [f32; 3], gyro: [f32; 3]) -> ConditionedSample {
        ConditionedSample {
            timestamp_ms: 0,
            front: ImuReading::new(front_accel, gyro),
            rear: ImuReading::new(rear_accel, gyro.map(|g| -g)),
            front_magnitude: magnitude(front_accel),
            rear_magnitude: magnitude(rear_accel),
        }
    }

    fn filled_window(samples: &[ConditionedSample]) -> SlidingWindow<ConditionedSample> {
        let mut window = SlidingWindow::new(samples.len()).unwrap();
        for s in samples {
            window.insert(*s);
        }
        window
    }

    #[test]
    fn test_not_ready_before_fill() {
        let extractor = FeatureExtractor::default();
        let mut window = SlidingWindow::with_default_capacity();
        window.insert(ConditionedSample::default());

        assert!(matches!(
            extractor.extract(&window),
            Err(FeatureError::NotReady(_))
        ));
    }

    #[test]
    fn test_capacity_mismatch() {
        let extractor = FeatureExtractor::default();
        let window = filled_window(&[ConditionedSample::default(); 10]);

        assert_eq!(
            extractor.extract(&window),
            Err(FeatureError::CapacityMismatch {
                expected: WINDOW_SIZE,
                actual: 10
            })
        );
    }

    #[test]
    fn test_all_zero_window() {
        let extractor = FeatureExtractor::default();
        let window = filled_window(&[ConditionedSample::default(); WINDOW_SIZE]);

        let features = extractor.extract(&window).unwrap();
        assert!(features.values().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_constant_window_has_zero_spread() {
        let extractor = FeatureExtractor::default();
        let s = sample([2.0, 2.0, 2.0], [2.0, 2.0, 2.0], [2.0, 2.0, 2.0]);
        let features = extractor.extract(&filled_window(&[s; WINDOW_SIZE])).unwrap();

        for feature in Feature::ALL {
            let value = features.get(feature);
            match feature {
                Feature::Accel { stat: Stat::StdDev, .. }
                | Feature::MagnitudeStd(_)
                | Feature::GyroStd { .. } => assert_eq!(value, 0.0, "{}", feature.name()),
                Feature::MagnitudeMax(_) => assert!((value - 12f32.sqrt()).abs() < 1e-5),
                Feature::Accel { .. } => assert_eq!(value, 2.0, "{}", feature.name()),
            }
        }
    }

    #[test]
    fn test_layout_per_group() {
        let extractor = FeatureExtractor::default();
        let samples: Vec<ConditionedSample> = (0..WINDOW_SIZE)
            .map(|i| {
                let v = i as f32;
                sample([v, 0.0, -v], [0.0, 2.0 * v, 0.0], [0.0, 0.0, if i % 2 == 0 { 1.0 } else { -1.0 }])
            })
            .collect();
        let features = extractor.extract(&filled_window(&samples)).unwrap();

        let front_x = |stat| features.get(Feature::Accel { mount: Mount::Front, axis: Axis::X, stat });
        assert_eq!(front_x(Stat::Min), 0.0);
        assert_eq!(front_x(Stat::Max), 49.0);
        assert!((front_x(Stat::Mean) - 24.5).abs() < 1e-4);
        // Population std of 0..50
        assert!((front_x(Stat::StdDev) - 14.430869).abs() < 1e-3);

        let front_z_max = features.get(Feature::Accel { mount: Mount::Front, axis: Axis::Z, stat: Stat::Max });
        assert_eq!(front_z_max, 0.0);
        let rear_y_max = features.get(Feature::Accel { mount: Mount::Rear, axis: Axis::Y, stat: Stat::Max });
        assert_eq!(rear_y_max, 98.0);

        assert!((features.get(Feature::MagnitudeMax(Mount::Rear)) - 98.0).abs() < 1e-4);
        assert!((features.get(Feature::GyroStd { mount: Mount::Front, axis: Axis::Z }) - 1.0).abs() < 1e-6);
        assert!((features.get(Feature::GyroStd { mount: Mount::Rear, axis: Axis::Z }) - 1.0).abs() < 1e-6);
        assert_eq!(features.get(Feature::GyroStd { mount: Mount::Front, axis: Axis::X }), 0.0);
    }

    #[test]
    fn test_extract_does_not_mutate_window() {
        let extractor = FeatureExtractor::default();
        let samples: Vec<ConditionedSample> = (0..WINDOW_SIZE)
            .map(|i| sample([i as f32, 1.0, 9.8], [0.0; 3], [0.1; 3]))
            .collect();
        let window = filled_window(&samples);
        let before = window.snapshot().unwrap().to_vec();

        extractor.extract(&window).unwrap();
        assert_eq!(window.snapshot().unwrap(), before.as_slice());
    }

    proptest! {
        #[test]
        fn prop_order_independent(
            values in prop::collection::vec((-20.0f32..20.0, -20.0f32..20.0, -5.0f32..5.0), WINDOW_SIZE),
            seed in any::<u64>(),
        ) {
            let extractor = FeatureExtractor::default();
            let samples: Vec<ConditionedSample> = values
                .iter()
                .map(|&(a, b, g)| sample([a, b, a - b], [b, a, 9.8], [g, -g, g * 0.5]))
                .collect();

            // Rotate then reverse: a permutation driven by the seed
            let mut permuted = samples.clone();
            permuted.rotate_left((seed % WINDOW_SIZE as u64) as usize);
            permuted.reverse();

            let a = extractor.extract_from_samples(&samples).unwrap();
            let b = extractor.extract_from_samples(&permuted).unwrap();
            for (x, y) in a.values().iter().zip(b.values()) {
                prop_assert!((x - y).abs() <= 1e-4 * (1.0 + x.abs()));
            }
        }
    }
}
