// One-shot platform detection
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::application::constants::{
    DEBUG_PATTERNS, OPENTOFU_MARKER, VERSION_COMMAND, VERSION_PROBE_TIMEOUT,
};
use crate::application::executor::run_platform_command;
use crate::application::verifier::verify_binary;
use crate::domain::{CommandContext, Platform, PlatformConfig};
use crate::port::{CommandRunner, DetectionError, ProcessInspector};

/// Tunables for detection
#[derive(Debug, Clone)]
pub struct DetectionSettings {
    /// Upper bound for the `version` probe
    pub version_timeout: Duration,
    /// Case-sensitive path substrings classifying the parent as a debug server
    pub debug_patterns: Vec<String>,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            version_timeout: VERSION_PROBE_TIMEOUT,
            debug_patterns: DEBUG_PATTERNS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

/// Determines which binary launched the provider
///
/// Detection never fails: anything ambiguous degrades to
/// `Platform::Unknown`, which is final for the process lifetime.
pub struct PlatformDetector {
    inspector: Arc<dyn ProcessInspector>,
    runner: Arc<dyn CommandRunner>,
    settings: DetectionSettings,
}

impl PlatformDetector {
    /// Create a new detector
    ///
    /// # Arguments
    /// * `inspector` - Process table access used to find the parent binary
    /// * `runner` - Runner for the `version` probe
    /// * `settings` - Probe timeout and debug patterns
    pub fn new(
        inspector: Arc<dyn ProcessInspector>,
        runner: Arc<dyn CommandRunner>,
        settings: DetectionSettings,
    ) -> Self {
        Self {
            inspector,
            runner,
            settings,
        }
    }

    /// Run the detection sequence once and return the resulting config
    pub async fn detect(&self) -> PlatformConfig {
        let config = self.classify().await;

        info!(
            platform = %config.platform(),
            binary_path = ?config.binary_path(),
            "Detected executing platform"
        );

        config
    }

    async fn classify(&self) -> PlatformConfig {
        let binary_path = match self.resolve_parent_binary() {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Error detecting executing binary");
                return PlatformConfig::unknown();
            }
        };

        if let Err(e) = verify_binary(&binary_path) {
            warn!(error = %e, "Binary verification failed");
            return PlatformConfig::new(Platform::Unknown, Some(binary_path));
        }

        if let Some(pattern) = self.matching_debug_pattern(&binary_path) {
            debug!(
                pattern = %pattern,
                binary_path = %binary_path.display(),
                "Parent binary matches debug pattern"
            );
            return PlatformConfig::new(Platform::DebugServer, Some(binary_path));
        }

        let ctx = CommandContext::with_timeout(self.settings.version_timeout);
        let output = match run_platform_command(
            self.runner.as_ref(),
            &binary_path,
            &[VERSION_COMMAND],
            &ctx,
        )
        .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(
                    error = %e,
                    timed_out = e.is_deadline_exceeded(),
                    "Failed to execute version command"
                );
                return PlatformConfig::new(Platform::Unknown, Some(binary_path));
            }
        };

        PlatformConfig::new(classify_version_output(&output.stdout), Some(binary_path))
    }

    fn resolve_parent_binary(&self) -> Result<PathBuf, DetectionError> {
        let ppid = self.inspector.parent_pid()?;
        let path = self.inspector.executable_path(ppid)?;
        debug!(ppid = ppid, binary_path = %path.display(), "Resolved parent executable");
        Ok(path)
    }

    fn matching_debug_pattern(&self, path: &Path) -> Option<&str> {
        let path = path.to_string_lossy();
        self.settings
            .debug_patterns
            .iter()
            .find(|pattern| path.contains(pattern.as_str()))
            .map(String::as_str)
    }
}

/// Classify the stdout of `<binary> version`
pub fn classify_version_output(stdout: &str) -> Platform {
    if stdout.to_lowercase().contains(OPENTOFU_MARKER) {
        Platform::OpenTofu
    } else {
        Platform::Terraform
    }
}
