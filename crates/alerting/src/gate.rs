//! Event Gate Implementation

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// Reference cooldown between accepted detections
pub const DEFAULT_COOLDOWN_MS: u64 = 5000;

/// Gate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Minimum elapsed time between two accepted detections (milliseconds)
    pub cooldown_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

/// Gate state at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateState {
    /// Cooldown elapsed (or nothing accepted yet); evaluation allowed
    Armed,
    /// Inside the cooldown after an acceptance
    Cooling,
}

/// Whether the pipeline should evaluate the classifier this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsiderDecision {
    Evaluate,
    /// Classification is skipped entirely
    Skip { remaining_ms: u64 },
}

/// Accepted detection handed to reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectionEvent {
    /// 1-based, strictly increasing
    pub sequence: u64,
    /// Acceptance time (ms on the loop clock)
    pub accepted_at_ms: u64,
}

/// Result of one gated evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Cooldown active; the classifier was not run
    Suppressed { remaining_ms: u64 },
    /// Classifier ran and returned negative
    Rejected,
    /// Classifier ran, returned positive, and the event was accepted
    Accepted(DetectionEvent),
}

/// Cooldown gate for detections.
///
/// Starts armed. Acceptance moves it to cooling; it re-arms once strictly more
/// than `cooldown_ms` has elapsed since the last acceptance.
#[derive(Debug, Clone)]
pub struct EventGate {
    config: GateConfig,
    last_accept_ms: Option<u64>,
    accepted: u64,
}

impl EventGate {
    /// Create a new gate
    pub fn new(config: GateConfig) -> Self {
        info!("Creating event gate: cooldown={}ms", config.cooldown_ms);
        Self {
            config,
            last_accept_ms: None,
            accepted: 0,
        }
    }

    /// State of the gate at `now_ms`
    pub fn state(&self, now_ms: u64) -> GateState {
        match self.consider(now_ms) {
            ConsiderDecision::Evaluate => GateState::Armed,
            ConsiderDecision::Skip { .. } => GateState::Cooling,
        }
    }

    /// Check whether an evaluation may run at `now_ms`
    pub fn consider(&self, now_ms: u64) -> ConsiderDecision {
        let Some(last) = self.last_accept_ms else {
            return ConsiderDecision::Evaluate;
        };
        let elapsed = now_ms.saturating_sub(last);
        if elapsed > self.config.cooldown_ms {
            ConsiderDecision::Evaluate
        } else {
            ConsiderDecision::Skip {
                remaining_ms: (self.config.cooldown_ms - elapsed).saturating_add(1),
            }
        }
    }

    /// Accept a positive classification if the gate is armed
    pub fn accept(&mut self, now_ms: u64) -> Option<DetectionEvent> {
        if let ConsiderDecision::Skip { remaining_ms } = self.consider(now_ms) {
            debug!("Detection refused: cooling for another {}ms", remaining_ms);
            return None;
        }

        self.accepted += 1;
        self.last_accept_ms = Some(now_ms);
        info!("Detection accepted: #{} at {}ms", self.accepted, now_ms);

        Some(DetectionEvent {
            sequence: self.accepted,
            accepted_at_ms: now_ms,
        })
    }

    /// Run `classify` only when armed, accepting on a positive result
    pub fn evaluate<F, E>(&mut self, now_ms: u64, classify: F) -> Result<GateOutcome, E>
    where
        F: FnOnce() -> Result<bool, E>,
    {
        if let ConsiderDecision::Skip { remaining_ms } = self.consider(now_ms) {
            trace!("Evaluation skipped: {}ms of cooldown left", remaining_ms);
            return Ok(GateOutcome::Suppressed { remaining_ms });
        }

        if !classify()? {
            return Ok(GateOutcome::Rejected);
        }

        Ok(self
            .accept(now_ms)
            .map(GateOutcome::Accepted)
            .unwrap_or(GateOutcome::Rejected))
    }

    /// Number of accepted detections
    pub fn accepted_count(&self) -> u64 {
        self.accepted
    }

    /// Time of the last acceptance
    pub fn last_accept_ms(&self) -> Option<u64> {
        self.last_accept_ms
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }
}

impl Default for EventGate {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::convert::Infallible;

    fn positive() -> Result<bool, Infallible> {
        Ok(true)
    }

    #[test]
    fn test_starts_armed() {
        let gate = EventGate::default();
        assert_eq!(gate.state(0), GateState::Armed);
        assert_eq!(gate.accepted_count(), 0);
    }

    #[test]
    fn test_accept_then_cool() {
        let mut gate = EventGate::default();

        let outcome = gate.evaluate(1000, positive).unwrap();
        assert_eq!(
            outcome,
            GateOutcome::Accepted(DetectionEvent {
                sequence: 1,
                accepted_at_ms: 1000
            })
        );
        assert_eq!(gate.state(1000), GateState::Cooling);

        // 100ms later: suppressed, counter unchanged
        let outcome = gate.evaluate(1100, positive).unwrap();
        assert!(matches!(outcome, GateOutcome::Suppressed { .. }));
        assert_eq!(gate.accepted_count(), 1);
    }

    #[test]
    fn test_unbounded_cooldown_saturates() {
        let mut gate = EventGate::new(GateConfig {
            cooldown_ms: u64::MAX,
        });
        gate.accept(0).unwrap();

        assert_eq!(
            gate.consider(0),
            ConsiderDecision::Skip {
                remaining_ms: u64::MAX
            }
        );
        assert!(gate.accept(u64::MAX).is_none());
    }

    #[test]
    fn test_cooldown_is_strict() {
        let mut gate = EventGate::default();
        gate.accept(0).unwrap();

        assert_eq!(gate.consider(5000), ConsiderDecision::Skip { remaining_ms: 1 });
        assert_eq!(gate.consider(5001), ConsiderDecision::Evaluate);
        assert_eq!(gate.accept(5001).unwrap().sequence, 2);
    }

    #[test]
    fn test_classifier_not_run_while_cooling() {
        let mut gate = EventGate::default();
        gate.accept(0).unwrap();

        let mut called = false;
        let outcome = gate
            .evaluate(10, || -> Result<bool, Infallible> {
                called = true;
                Ok(true)
            })
            .unwrap();

        assert!(!called);
        assert_eq!(outcome, GateOutcome::Suppressed { remaining_ms: 4991 });
    }

    #[test]
    fn test_negative_changes_nothing() {
        let mut gate = EventGate::default();
        let outcome = gate.evaluate(0, || Ok::<_, Infallible>(false)).unwrap();

        assert_eq!(outcome, GateOutcome::Rejected);
        assert_eq!(gate.last_accept_ms(), None);
        assert_eq!(gate.state(0), GateState::Armed);
    }

    #[test]
    fn test_classifier_error_propagates() {
        let mut gate = EventGate::default();
        let result = gate.evaluate(0, || Err::<bool, _>("not ready"));
        assert_eq!(result, Err("not ready"));
        assert_eq!(gate.accepted_count(), 0);
    }

    #[test]
    fn test_event_json() {
        let event = DetectionEvent {
            sequence: 3,
            accepted_at_ms: 12_000,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"sequence":3,"accepted_at_ms":12000}"#);
    }

    proptest! {
        #[test]
        fn prop_accepted_events_respect_cooldown(
            cooldown_ms in 1u64..10_000,
            steps in prop::collection::vec((1u64..2_000, any::<bool>()), 1..300),
        ) {
            let mut gate = EventGate::new(GateConfig { cooldown_ms });
            let mut now = 0;
            let mut accepted = Vec::new();

            for (dt, verdict) in steps {
                now += dt;
                if let GateOutcome::Accepted(event) = gate.evaluate(now, || Ok::<_, Infallible>(verdict)).unwrap() {
                    accepted.push(event);
                }
            }

            for pair in accepted.windows(2) {
                prop_assert!(pair[1].accepted_at_ms - pair[0].accepted_at_ms > cooldown_ms);
                prop_assert_eq!(pair[1].sequence, pair[0].sequence + 1);
            }
            prop_assert_eq!(gate.accepted_count(), accepted.len() as u64);
        }
    }
}
