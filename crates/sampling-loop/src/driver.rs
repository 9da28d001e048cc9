//! Fixed-Rate Sampling Driver

use crate::context::{Detection, PipelineContext, TickOutcome};
use crate::source::{LocationSource, SensorSource};
use crate::status::StatusReport;
use crate::PipelineError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::time::{Duration, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Configuration for the sampling loop
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// Nominal tick period (default: 10ms, ~100Hz)
    pub tick_period_ms: u64,
    /// Interval between status reports
    pub status_interval_ms: u64,
    /// Detections buffered for the reporting task before new ones are dropped
    pub report_queue_capacity: usize,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: 10,
            status_interval_ms: 1000,
            report_queue_capacity: 16,
        }
    }
}

/// Counters collected over one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoopSummary {
    pub ticks: u64,
    pub sensor_errors: u64,
    pub detections: u64,
    pub dropped_reports: u64,
}

/// Drives the pipeline at a fixed tick rate.
///
/// Detections go out with `try_send`; a full queue drops the report instead
/// of delaying the next sample.
pub struct SamplingLoop {
    config: LoopConfig,
    running: Arc<AtomicBool>,
    summary: LoopSummary,
    last_status: Option<StatusReport>,
}

impl SamplingLoop {
    /// Create a new sampling loop
    pub fn new(config: LoopConfig) -> Self {
        info!(
            "Sampling loop created: tick={}ms, status every {}ms, queue={}",
            config.tick_period_ms, config.status_interval_ms, config.report_queue_capacity
        );
        Self {
            config,
            running: Arc::new(AtomicBool::new(true)),
            summary: LoopSummary::default(),
            last_status: None,
        }
    }

    /// Bounded channel sized for this loop's report queue
    pub fn report_channel(&self) -> (mpsc::Sender<Detection>, mpsc::Receiver<Detection>) {
        mpsc::channel(self.config.report_queue_capacity.max(1))
    }

    /// Flag that stops the loop after the current tick when cleared
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Stop the loop
    pub fn stop(&self) {
        info!("Stopping sampling loop");
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if the loop is (still) allowed to run
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run until the sensor stream ends or the loop is stopped
    pub async fn run<S, L>(
        &mut self,
        ctx: &mut PipelineContext,
        sensors: &mut S,
        location: &mut L,
        reports: &mpsc::Sender<Detection>,
    ) -> Result<LoopSummary, PipelineError>
    where
        S: SensorSource,
        L: LocationSource,
    {
        info!("Starting sampling loop");

        let start = Instant::now();
        let mut ticker = tokio::time::interval(Duration::from_millis(self.config.tick_period_ms.max(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut next_status_ms = self.config.status_interval_ms;

        while self.is_running() {
            ticker.tick().await;
            let now_ms = start.elapsed().as_millis() as u64;

            if let Some(fix) = location.poll() {
                debug!("Location update: {:.6}, {:.6}", fix.latitude, fix.longitude);
                ctx.update_location(fix);
            }

            let mut raw = match sensors.read() {
                Ok(Some(raw)) => raw,
                Ok(None) => {
                    info!("Sensor stream ended");
                    break;
                }
                Err(e) => {
                    warn!("Sensor read error: {}", e);
                    self.summary.sensor_errors += 1;
                    continue;
                }
            };
            raw.timestamp_ms = now_ms;
            self.summary.ticks += 1;

            if let TickOutcome::Evaluated {
                detection: Some(detection),
                ..
            } = ctx.tick(&raw, now_ms)?
            {
                self.summary.detections += 1;
                self.dispatch(reports, detection)?;
            }

            if now_ms >= next_status_ms {
                let status = ctx.status(&raw, now_ms);
                info!("{}", status);
                self.last_status = Some(status);
                next_status_ms = now_ms + self.config.status_interval_ms;
            }
        }

        info!(
            "Sampling loop stopped: ticks={}, detections={}, dropped reports={}",
            self.summary.ticks, self.summary.detections, self.summary.dropped_reports
        );
        Ok(self.summary)
    }

    fn dispatch(
        &mut self,
        reports: &mpsc::Sender<Detection>,
        detection: Detection,
    ) -> Result<(), PipelineError> {
        match reports.try_send(detection) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(detection)) => {
                warn!(
                    "Report queue full, dropping report for detection #{}",
                    detection.event.sequence
                );
                self.summary.dropped_reports += 1;
                Ok(())
            }
            Err(TrySendError::Closed(_)) => {
                error!("Report queue closed, reporting task is gone");
                Err(PipelineError::ReportQueueClosed)
            }
        }
    }

    /// Most recent status report
    pub fn last_status(&self) -> Option<&StatusReport> {
        self.last_status.as_ref()
    }

    /// Counters so far
    pub fn summary(&self) -> LoopSummary {
        self.summary
    }
}
