//! Reporting Task

use crate::notification::{Notification, NotificationBudget};
use crate::payload::DetectionReport;
use crate::sink::ReportSink;
use sampling_loop::Detection;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Maximum notifications per session
    pub notification_limit: usize,
    /// Prefix for map links; coordinates are appended as `lat,lng`
    pub maps_base_url: String,
    /// Log full JSON payloads
    pub verbose: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            notification_limit: 10,
            maps_base_url: "https://maps.google.com/?q=".to_string(),
            verbose: false,
        }
    }
}

/// Counters for one reporting session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReporterSummary {
    pub reports_sent: u64,
    pub report_failures: u64,
    pub notifications_sent: u64,
    pub notification_failures: u64,
}

/// Drains the detection queue into a sink.
///
/// Runs as its own task so slow sinks never hold up sampling.
pub struct Reporter<S> {
    sink: S,
    config: ReportingConfig,
    budget: NotificationBudget,
    summary: ReporterSummary,
}

impl<S: ReportSink> Reporter<S> {
    pub fn new(sink: S, config: ReportingConfig) -> Self {
        info!(
            "Creating reporter: notification limit={}",
            config.notification_limit
        );
        Self {
            sink,
            budget: NotificationBudget::new(config.notification_limit),
            config,
            summary: ReporterSummary::default(),
        }
    }

    /// Process detections until the sending side closes
    pub async fn run(mut self, mut detections: mpsc::Receiver<Detection>) -> ReporterSummary {
        info!("Starting reporter");

        while let Some(detection) = detections.recv().await {
            self.handle(&detection).await;
        }

        info!(
            "Reporter stopped: {} reports, {} notifications",
            self.summary.reports_sent, self.summary.notifications_sent
        );
        self.summary
    }

    /// Report one detection; sink failures are logged, not propagated
    pub async fn handle(&mut self, detection: &Detection) {
        let report = DetectionReport::from_detection(detection);
        match self.sink.send_report(&report).await {
            Ok(()) => self.summary.reports_sent += 1,
            Err(e) => {
                warn!("Failed to send report #{}: {}", report.count, e);
                self.summary.report_failures += 1;
            }
        }

        let Some(fix) = detection.location else {
            debug!("No location fix, skipping notification for #{}", report.count);
            return;
        };
        if !self.budget.try_acquire() {
            return;
        }

        let notification = Notification::pothole(
            fix,
            detection.event.sequence,
            detection.event.accepted_at_ms,
            &self.config.maps_base_url,
        );
        match self.sink.send_notification(&notification).await {
            Ok(()) => self.summary.notifications_sent += 1,
            Err(e) => {
                warn!("Failed to send notification for #{}: {}", report.count, e);
                self.summary.notification_failures += 1;
            }
        }
    }

    pub fn summary(&self) -> ReporterSummary {
        self.summary
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
