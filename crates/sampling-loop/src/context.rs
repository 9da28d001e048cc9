//! Pipeline Context

use crate::source::GeoFix;
use crate::status::StatusReport;
use crate::PipelineError;
use alerting::{DetectionEvent, EventGate, GateConfig, GateOutcome};
use feature_engine::FeatureExtractor;
use inference_engine::{ClassifierModel, Decision, LinearClassifier};
use ring_buffer::{SlidingWindow, WINDOW_SIZE};
use serde::{Deserialize, Serialize};
use signal_conditioner::{Axis, ConditionedSample, ConditionerConfig, RawSample, SignalConditioner};
use tracing::{info, warn};

/// Configuration of the sensing-to-decision core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub conditioner: ConditionerConfig,
    pub gate: GateConfig,
    /// Samples per feature window
    pub window_size: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            conditioner: ConditionerConfig::default(),
            gate: GateConfig::default(),
            window_size: WINDOW_SIZE,
        }
    }
}

/// Accepted detection with everything reporting needs
#[derive(Debug, Clone, Serialize)]
pub struct Detection {
    pub event: DetectionEvent,
    /// Classifier decision value
    pub score: f32,
    /// Most recent known position, if any
    pub location: Option<GeoFix>,
    /// Window contents, oldest first
    pub window: Vec<ConditionedSample>,
}

/// What happened during one tick
#[derive(Debug, Clone)]
pub enum TickOutcome {
    /// Window still filling; nothing evaluated
    Filling { inserted: usize },
    /// Cooldown active; classification skipped
    Suppressed { remaining_ms: u64 },
    /// Classifier ran
    Evaluated {
        decision: Decision,
        detection: Option<Detection>,
    },
}

/// Owns all mutable pipeline state: smoothing accumulators, the window,
/// the gate and the last known position.
pub struct PipelineContext {
    conditioner: SignalConditioner,
    window: SlidingWindow<ConditionedSample>,
    extractor: FeatureExtractor,
    classifier: LinearClassifier,
    gate: EventGate,
    location: Option<GeoFix>,
}

impl PipelineContext {
    /// Initialize the pipeline with zeroed state
    pub fn new(config: &PipelineConfig, model: ClassifierModel) -> Result<Self, PipelineError> {
        info!(
            "Initializing pipeline: window={}, alpha={}, cooldown={}ms",
            config.window_size, config.conditioner.alpha, config.gate.cooldown_ms
        );

        Ok(Self {
            conditioner: SignalConditioner::new(&config.conditioner)?,
            window: SlidingWindow::new(config.window_size)?,
            extractor: FeatureExtractor::new(config.window_size),
            classifier: LinearClassifier::new(model),
            gate: EventGate::new(config.gate.clone()),
            location: None,
        })
    }

    /// Process one raw sample captured at `now_ms`
    pub fn tick(&mut self, raw: &RawSample, now_ms: u64) -> Result<TickOutcome, PipelineError> {
        let conditioned = self.conditioner.condition(raw);
        self.window.insert(conditioned);

        if !self.window.is_filled() {
            return Ok(TickOutcome::Filling {
                inserted: self.window.len(),
            });
        }
        if self.window.total_inserted() == self.window.capacity() as u64 {
            info!("Sample window filled ({} samples), detection armed", self.window.capacity());
        }

        let mut decision = None;
        let (extractor, classifier, window) = (&self.extractor, &self.classifier, &self.window);
        let outcome = self.gate.evaluate(now_ms, || {
            let features = extractor.extract(window)?;
            let d = classifier.evaluate(&features);
            decision = Some(d);
            Ok::<_, PipelineError>(d.positive)
        })?;

        match (outcome, decision) {
            (GateOutcome::Suppressed { remaining_ms }, _) => {
                Ok(TickOutcome::Suppressed { remaining_ms })
            }
            (GateOutcome::Accepted(event), Some(decision)) => {
                match self.location {
                    Some(fix) => warn!(
                        "Pothole detected! count={} score={:.3} location={:.6},{:.6}",
                        event.sequence, decision.score, fix.latitude, fix.longitude
                    ),
                    None => warn!(
                        "Pothole detected! count={} score={:.3} location=unknown",
                        event.sequence, decision.score
                    ),
                }
                let detection = Detection {
                    event,
                    score: decision.score,
                    location: self.location,
                    window: self.window.chronological()?,
                };
                Ok(TickOutcome::Evaluated {
                    decision,
                    detection: Some(detection),
                })
            }
            (_, Some(decision)) => Ok(TickOutcome::Evaluated {
                decision,
                detection: None,
            }),
            // The gate only skips the classifier when suppressing
            (_, None) => Ok(TickOutcome::Suppressed { remaining_ms: 0 }),
        }
    }

    /// Record a new position fix
    pub fn update_location(&mut self, fix: GeoFix) {
        self.location = Some(fix);
    }

    pub fn location(&self) -> Option<GeoFix> {
        self.location
    }

    /// Diagnostic snapshot built from the latest written slot
    pub fn status(&self, raw: &RawSample, now_ms: u64) -> StatusReport {
        let latest = self.window.latest().copied().unwrap_or_default();
        StatusReport {
            uptime_ms: now_ms,
            front_accel_z: raw.front.accel(Axis::Z),
            rear_accel_z: raw.rear.accel(Axis::Z),
            front_magnitude: latest.front_magnitude,
            rear_magnitude: latest.rear_magnitude,
            detections: self.gate.accepted_count(),
            window_filled: self.window.is_filled(),
            location: self.location,
        }
    }

    /// Number of accepted detections
    pub fn detections(&self) -> u64 {
        self.gate.accepted_count()
    }

    pub fn window(&self) -> &SlidingWindow<ConditionedSample> {
        &self.window
    }

    pub fn gate(&self) -> &EventGate {
        &self.gate
    }
}
