//! Report Sinks

use crate::notification::Notification;
use crate::payload::DetectionReport;
use crate::ReportError;
use std::future::Future;
use tracing::info;

/// Destination for detection reports and notifications
pub trait ReportSink: Send {
    /// Deliver a full detection report
    fn send_report(
        &mut self,
        report: &DetectionReport,
    ) -> impl Future<Output = Result<(), ReportError>> + Send;

    /// Deliver a location notification
    fn send_notification(
        &mut self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), ReportError>> + Send;
}

/// Sink that writes reports to the log
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    /// Include the full JSON payload in the log line
    pub verbose: bool,
}

impl ReportSink for LogSink {
    async fn send_report(&mut self, report: &DetectionReport) -> Result<(), ReportError> {
        if self.verbose {
            let json = serde_json::to_string(report)?;
            info!(report_id = %report.report_id, "Detection report: {}", json);
        } else {
            info!(
                report_id = %report.report_id,
                "Detection report #{} ({} samples, score {:.3})",
                report.count,
                report.accelerometer_data.len(),
                report.score
            );
        }
        Ok(())
    }

    async fn send_notification(&mut self, notification: &Notification) -> Result<(), ReportError> {
        info!("{}: {}", notification.subject, notification.body.replace('\n', " | "));
        Ok(())
    }
}
