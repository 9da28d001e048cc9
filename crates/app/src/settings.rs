//! Application Configuration
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `POTHOLE__`-prefixed environment variables
//! (e.g. `POTHOLE__PIPELINE__GATE__COOLDOWN_MS=3000`).

use config::{Config, ConfigError, Environment, File};
use reporting::ReportingConfig;
use sampling_loop::{GeoFix, LoopConfig, PipelineConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when no path is given
const DEFAULT_CONFIG_NAME: &str = "pothole-monitor";
const ENV_PREFIX: &str = "POTHOLE";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub pipeline: PipelineConfig,
    pub sampling: LoopConfig,
    pub reporting: ReportingConfig,
    pub model: ModelConfig,
    pub sensors: SensorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// `.bin` files are read as raw little-endian weights, anything else as JSON
    pub path: PathBuf,
    /// Decision threshold for raw weight files, which carry none
    pub raw_threshold: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("model.json"),
            raw_threshold: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// JSON-lines file of recorded dual-IMU samples
    pub replay_path: PathBuf,
    /// Position attached to detections when no receiver is present
    pub fixed_location: Option<GeoFix>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            replay_path: PathBuf::from("samples.jsonl"),
            fixed_location: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, file and process environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: Option<&Path>, env: Environment) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(file)
            .add_source(env.separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn no_env() -> Environment {
        Environment::with_prefix(ENV_PREFIX).source(Some(HashMap::new()))
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.pipeline.conditioner.alpha, 0.1);
        assert_eq!(config.pipeline.gate.cooldown_ms, 5000);
        assert_eq!(config.pipeline.window_size, 50);
        assert_eq!(config.sampling.tick_period_ms, 10);
        assert_eq!(config.reporting.notification_limit, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.sensors.fixed_location.is_none());
    }

    #[test]
    fn test_load_without_file_keeps_defaults() {
        let config = AppConfig::load_with(None, no_env()).unwrap();
        assert_eq!(config.pipeline.gate.cooldown_ms, 5000);
        assert_eq!(config.model.path, PathBuf::from("model.json"));
    }

    #[test]
    fn test_explicit_file_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(AppConfig::load_with(Some(&missing), no_env()).is_err());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[pipeline.gate]
cooldown_ms = 2500

[model]
path = "weights.bin"
raw_threshold = 1.5

[sensors.fixed_location]
latitude = 12.9716
longitude = 79.1594
"#
        )
        .unwrap();

        let config = AppConfig::load_with(Some(file.path()), no_env()).unwrap();
        assert_eq!(config.pipeline.gate.cooldown_ms, 2500);
        assert_eq!(config.pipeline.conditioner.alpha, 0.1);
        assert_eq!(config.model.path, PathBuf::from("weights.bin"));
        assert_eq!(config.model.raw_threshold, 1.5);
        let fix = config.sensors.fixed_location.unwrap();
        assert_eq!(fix.latitude, 12.9716);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[sampling]\ntick_period_ms = 20").unwrap();

        let vars = HashMap::from([
            ("POTHOLE__SAMPLING__TICK_PERIOD_MS".to_string(), "5".to_string()),
            ("POTHOLE__LOGGING__JSON".to_string(), "true".to_string()),
        ]);
        let env = Environment::with_prefix(ENV_PREFIX).source(Some(vars));

        let config = AppConfig::load_with(Some(file.path()), env).unwrap();
        assert_eq!(config.sampling.tick_period_ms, 5);
        assert!(config.logging.json);
    }
}
