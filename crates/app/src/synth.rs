//! Synthetic Road Recordings
//!
//! Produces dual-IMU samples for a drive over an ordinary road with potholes
//! placed along it. Each pothole is a Gaussian jolt hitting the front sensor
//! first and the rear sensor one wheelbase later.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use signal_conditioner::{ImuReading, RawSample};
use std::io::{self, Write};

const GRAVITY: f32 = 9.81;

/// Shape of the generated drive
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadProfile {
    pub sample_rate_hz: u32,
    pub duration_s: f32,
    pub potholes: usize,
    /// Samples between the front and rear sensor reaching the same spot
    pub wheelbase_delay: usize,
    /// Length of one impact (samples)
    pub impact_samples: usize,
    pub seed: u64,
}

impl Default for RoadProfile {
    fn default() -> Self {
        Self {
            sample_rate_hz: 100,
            duration_s: 60.0,
            potholes: 6,
            wheelbase_delay: 25,
            impact_samples: 50,
            seed: 7,
        }
    }
}

/// Generated drive and where its potholes start (front sensor sample index)
#[derive(Debug, Clone)]
pub struct SyntheticRoad {
    pub samples: Vec<RawSample>,
    pub pothole_starts: Vec<usize>,
}

impl SyntheticRoad {
    /// Write one JSON `RawSample` per line
    pub fn write_jsonl<W: Write>(&self, mut out: W) -> io::Result<()> {
        for sample in &self.samples {
            serde_json::to_writer(&mut out, sample)?;
            out.write_all(b"\n")?;
        }
        out.flush()
    }
}

/// Seeded generator for synthetic drives
pub struct RoadGenerator {
    profile: RoadProfile,
    rng: StdRng,
}

impl RoadGenerator {
    pub fn new(profile: RoadProfile) -> Self {
        Self {
            rng: StdRng::seed_from_u64(profile.seed),
            profile,
        }
    }

    pub fn generate(&mut self) -> SyntheticRoad {
        let rate = self.profile.sample_rate_hz.max(1) as f32;
        let len = (self.profile.duration_s.max(0.0) * rate) as usize;

        let mut samples: Vec<RawSample> = (0..len)
            .map(|i| {
                let t = i as f32 / rate;
                RawSample::new(
                    (t * 1000.0) as u64,
                    self.road_reading(t),
                    self.road_reading(t),
                )
            })
            .collect();

        let pothole_starts = self.place_potholes(len);
        for &start in &pothole_starts {
            self.add_impact(&mut samples, start, true);
            self.add_impact(&mut samples, start + self.profile.wheelbase_delay, false);
        }

        SyntheticRoad {
            samples,
            pothole_starts,
        }
    }

    fn road_reading(&mut self, t: f32) -> ImuReading {
        let hum = 0.2 * (2.0 * std::f32::consts::PI * 5.0 * t).sin();
        ImuReading::new(
            [self.noise(0.2), self.noise(0.2), GRAVITY + hum + self.noise(0.3)],
            [self.noise(0.05), self.noise(0.05), self.noise(0.05)],
        )
    }

    /// Evenly spaced slots with some jitter, so consecutive potholes stay apart
    fn place_potholes(&mut self, len: usize) -> Vec<usize> {
        let count = self.profile.potholes;
        let footprint = self.profile.impact_samples + self.profile.wheelbase_delay;
        if count == 0 || len <= footprint {
            return Vec::new();
        }

        let slot = (len - footprint) / count;
        let jitter = slot / 10;
        (0..count)
            .map(|i| {
                let centre = i * slot + slot / 2;
                let offset = if jitter > 0 {
                    self.rng.gen_range(0..=2 * jitter)
                } else {
                    jitter
                };
                (centre + offset).saturating_sub(jitter)
            })
            .collect()
    }

    fn add_impact(&mut self, samples: &mut [RawSample], start: usize, front: bool) {
        let n = self.profile.impact_samples.max(2);
        for k in 0..n {
            let Some(sample) = samples.get_mut(start + k) else {
                break;
            };
            let x = -3.0 + 6.0 * k as f32 / (n - 1) as f32;
            let pulse = (-x * x).exp();
            let noise = [self.noise(0.1), self.noise(0.1), self.noise(0.1)];

            let reading = if front { &mut sample.front } else { &mut sample.rear };
            reading.accel[0] = 0.5 * GRAVITY * pulse + noise[0];
            reading.accel[1] = 0.3 * GRAVITY * pulse + noise[1];
            reading.accel[2] = GRAVITY * (1.0 - 2.0 * pulse) + noise[2];
            // Pitch as the wheel drops in and climbs out
            reading.gyro[1] = 1.5 * pulse * x.signum();
        }
    }

    fn noise(&mut self, amplitude: f32) -> f32 {
        self.rng.gen_range(-amplitude..amplitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use signal_conditioner::Axis;

    #[test]
    fn test_length_and_timestamps() {
        let road = RoadGenerator::new(RoadProfile {
            duration_s: 2.0,
            potholes: 0,
            ..Default::default()
        })
        .generate();

        assert_eq!(road.samples.len(), 200);
        assert!(road.pothole_starts.is_empty());
        assert_eq!(road.samples[100].timestamp_ms, 1000);
        assert!(road
            .samples
            .iter()
            .all(|s| (s.front.accel(Axis::Z) - GRAVITY).abs() < 1.0));
    }

    #[test]
    fn test_same_seed_same_road() {
        let profile = RoadProfile {
            duration_s: 5.0,
            potholes: 2,
            ..Default::default()
        };
        let a = RoadGenerator::new(profile.clone()).generate();
        let b = RoadGenerator::new(profile).generate();
        assert_eq!(a.samples, b.samples);
        assert_eq!(a.pothole_starts, b.pothole_starts);
    }

    #[test]
    fn test_rear_hits_after_front() {
        let profile = RoadProfile {
            duration_s: 10.0,
            potholes: 1,
            ..Default::default()
        };
        let delay = profile.wheelbase_delay;
        let half = profile.impact_samples / 2;
        let road = RoadGenerator::new(profile).generate();

        let start = road.pothole_starts[0];
        let front_peak = road.samples[start + half].front.accel(Axis::Z);
        let rear_before = road.samples[start + half].rear.accel(Axis::Z);
        let rear_peak = road.samples[start + delay + half].rear.accel(Axis::Z);

        assert!(front_peak < 0.0, "front dip {}", front_peak);
        assert!(rear_before > 8.0);
        assert!(rear_peak < 0.0, "rear dip {}", rear_peak);
    }

    #[test]
    fn test_potholes_stay_apart() {
        let road = RoadGenerator::new(RoadProfile::default()).generate();
        assert_eq!(road.pothole_starts.len(), 6);
        for pair in road.pothole_starts.windows(2) {
            // More than the 5 s cooldown at 100 Hz
            assert!(pair[1] - pair[0] > 500, "{:?}", pair);
        }
    }

    #[test]
    fn test_jsonl_lines_parse_back() {
        let road = RoadGenerator::new(RoadProfile {
            duration_s: 0.05,
            potholes: 0,
            ..Default::default()
        })
        .generate();

        let mut buf = Vec::new();
        road.write_jsonl(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let parsed: Vec<RawSample> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed.len(), 5);
        assert_eq!(parsed[0].front.accel, road.samples[0].front.accel);
    }
}
