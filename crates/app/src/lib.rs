//! Pothole Monitor
//!
//! Wires the sensing pipeline to its collaborators: loads configuration and
//! the classifier model, replays recorded sensor data at the tick rate, and
//! runs the reporting task beside the sampling loop.

mod replay;
mod settings;
mod synth;

pub use replay::JsonLinesSource;
pub use settings::{AppConfig, LoggingConfig, ModelConfig, SensorConfig};
pub use synth::{RoadGenerator, RoadProfile, SyntheticRoad};

use anyhow::Context;
use inference_engine::ClassifierModel;
use reporting::{LogSink, Reporter, ReporterSummary};
use sampling_loop::{FixedLocation, LoopSummary, PipelineContext, SamplingLoop};
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Counters from a finished run
#[derive(Debug, Clone, Copy)]
pub struct RunSummary {
    pub sampling: LoopSummary,
    pub reporting: ReporterSummary,
}

/// Fully initialized application
pub struct App {
    config: AppConfig,
    context: PipelineContext,
    sampling: SamplingLoop,
    sensors: JsonLinesSource,
}

impl App {
    /// Load the model, open the sensor replay and build the pipeline
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let model = ClassifierModel::load(&config.model.path, config.model.raw_threshold)
            .with_context(|| format!("Failed to load model from {}", config.model.path.display()))?;
        let context = PipelineContext::new(&config.pipeline, model)?;
        let sensors = JsonLinesSource::open(&config.sensors.replay_path).with_context(|| {
            format!(
                "Failed to open sensor replay {}",
                config.sensors.replay_path.display()
            )
        })?;
        let sampling = SamplingLoop::new(config.sampling.clone());

        Ok(Self {
            config,
            context,
            sampling,
            sensors,
        })
    }

    /// Clearing this flag stops sampling after the current tick
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.sampling.stop_handle()
    }

    /// Run until the replay ends or the app is stopped
    pub async fn run(&mut self) -> anyhow::Result<RunSummary> {
        let (tx, rx) = self.sampling.report_channel();
        let sink = LogSink {
            verbose: self.config.reporting.verbose,
        };
        let reporter = tokio::spawn(Reporter::new(sink, self.config.reporting.clone()).run(rx));

        let mut location = FixedLocation::from(self.config.sensors.fixed_location);
        let sampling = self
            .sampling
            .run(&mut self.context, &mut self.sensors, &mut location, &tx)
            .await;

        // Closing the queue lets the reporter drain and exit
        drop(tx);
        let reporting = reporter.await.context("Reporting task failed")?;
        let sampling = sampling?;

        info!(
            "Run complete: {} detections, {} reports, {} notifications",
            sampling.detections, reporting.reports_sent, reporting.notifications_sent
        );
        Ok(RunSummary {
            sampling,
            reporting,
        })
    }

    pub fn context(&self) -> &PipelineContext {
        &self.context
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let level = Level::from_str(&config.level)
        .with_context(|| format!("Invalid log level '{}'", config.level))?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    }
    .context("Failed to set tracing subscriber")
}
