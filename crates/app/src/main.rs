//! Pothole Monitor - Main Entry Point
//!
//! Usage:
//!   pothole-monitor [--config <path>]
//!   pothole-monitor generate <out.jsonl> [--seconds <s>] [--potholes <n>] [--seed <n>]

use anyhow::{bail, Context};
use pothole_monitor::{init_logging, App, AppConfig, LoggingConfig, RoadGenerator, RoadProfile};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("generate") {
        return generate(&args[1..]);
    }

    let config_path = config_path_from_args(&args);
    let config = AppConfig::load(config_path.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging)?;

    info!("=== Pothole Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let mut app = App::new(config)?;
    let stop = app.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, shutting down");
            stop.store(false, Ordering::SeqCst);
        }
    });

    let summary = app.run().await?;
    info!(
        "Done: {} ticks, {} detections, {} reports sent",
        summary.sampling.ticks, summary.sampling.detections, summary.reporting.reports_sent
    );
    Ok(())
}

/// `--config <path>`, falling back to `POTHOLE_CONFIG`
fn config_path_from_args(args: &[String]) -> Option<PathBuf> {
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    std::env::var_os("POTHOLE_CONFIG").map(PathBuf::from)
}

/// Write a synthetic drive as a replay file
fn generate(args: &[String]) -> anyhow::Result<()> {
    init_logging(&LoggingConfig::default())?;

    let mut output = None;
    let mut profile = RoadProfile::default();
    let mut args = args.iter();
    while let Some(arg) = args.next() {
        let mut value = || args.next().with_context(|| format!("{} needs a value", arg));
        match arg.as_str() {
            "--seconds" => profile.duration_s = value()?.parse().context("Invalid --seconds")?,
            "--potholes" => profile.potholes = value()?.parse().context("Invalid --potholes")?,
            "--seed" => profile.seed = value()?.parse().context("Invalid --seed")?,
            path if output.is_none() => output = Some(PathBuf::from(path)),
            other => bail!("Unexpected argument '{}'", other),
        }
    }
    let Some(output) = output else {
        bail!("Usage: pothole-monitor generate <out.jsonl> [--seconds <s>] [--potholes <n>] [--seed <n>]");
    };

    let road = RoadGenerator::new(profile).generate();
    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    road.write_jsonl(BufWriter::new(file))?;

    info!(
        "Wrote {} samples with {} potholes to {}",
        road.samples.len(),
        road.pothole_starts.len(),
        output.display()
    );
    Ok(())
}
