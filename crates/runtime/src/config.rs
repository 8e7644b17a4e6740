//! Runtime configuration from the environment
//!
//! # Environment Variables
//!
//! - `TFPLATFORM_LOG_FORMAT`: `pretty` (default), `compact` or `json`
//! - `TFPLATFORM_VERSION_TIMEOUT_SECS`: bound for the `version` probe (default: 10, max: 3600)
//! - `RUST_LOG`: tracing filter (default: `tfplatform=info`)

use std::str::FromStr;
use std::time::Duration;

use tfplatform_core::DetectionSettings;

pub const LOG_FORMAT_ENV: &str = "TFPLATFORM_LOG_FORMAT";
pub const VERSION_TIMEOUT_ENV: &str = "TFPLATFORM_VERSION_TIMEOUT_SECS";

/// Largest accepted `version` probe timeout (1 hour)
pub const MAX_VERSION_TIMEOUT_SECS: u64 = 60 * 60;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Development: multi-line, human oriented
    #[default]
    Pretty,
    Compact,
    /// Production: one JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format {other:?}")),
        }
    }
}

/// Everything the composition root needs before detection runs
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub log_format: LogFormat,
    pub detection: DetectionSettings,
    /// Problems found while reading the environment
    ///
    /// Logging is not up yet while the config is read, so these are kept
    /// for the caller to log once it is.
    pub warnings: Vec<String>,
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RuntimeConfig::default();

        if let Some(raw) = lookup(LOG_FORMAT_ENV) {
            match raw.parse() {
                Ok(format) => config.log_format = format,
                Err(e) => config
                    .warnings
                    .push(format!("{LOG_FORMAT_ENV}: {e}, using pretty")),
            }
        }

        if let Some(raw) = lookup(VERSION_TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 && secs <= MAX_VERSION_TIMEOUT_SECS => {
                    config.detection.version_timeout = Duration::from_secs(secs)
                }
                _ => config.warnings.push(format!(
                    "{VERSION_TIMEOUT_ENV}: invalid value {raw:?}, using {}s",
                    config.detection.version_timeout.as_secs()
                )),
            }
        }

        config
    }
}
