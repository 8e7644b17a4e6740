//! Provider Platform Runtime - process-wide platform state
//!
//! Composition root: wires the sysinfo inspector and the tokio subprocess
//! runner into the core, runs detection exactly once and exposes the result
//! to the rest of the provider.
//!
//! Call [`init`] at process start, before any other component is built.
//! Components that can take the config explicitly should receive
//! [`PlatformRuntime::config`] or [`PlatformRuntime::executor`] rather than
//! going through the free functions.

pub mod config;
pub mod logging;

use std::sync::Arc;
use tokio::sync::OnceCell;

use tfplatform_core::domain::ValidationError;
use tfplatform_core::port::{CommandRunner, ProcessInspector};
use tfplatform_core::{
    CommandContext, CommandOutput, DetectionSettings, Platform, PlatformConfig, PlatformDetector,
    PlatformExecutor, Result,
};
use tfplatform_infra_system::{SubprocessRunner, SysinfoProcessInspector};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static PLATFORM: OnceCell<PlatformRuntime> = OnceCell::const_new();

/// Detection result and the executor bound to it
pub struct PlatformRuntime {
    config: Arc<PlatformConfig>,
    executor: PlatformExecutor,
}

impl PlatformRuntime {
    pub fn config(&self) -> Arc<PlatformConfig> {
        Arc::clone(&self.config)
    }

    pub fn executor(&self) -> PlatformExecutor {
        self.executor.clone()
    }

    pub fn platform(&self) -> Platform {
        self.config.platform()
    }
}

/// Detect the platform with the host adapters, once per process
///
/// Later calls return the first result without detecting again.
pub async fn init(settings: DetectionSettings) -> &'static PlatformRuntime {
    init_with(
        Arc::new(SysinfoProcessInspector::new()),
        Arc::new(SubprocessRunner::new()),
        settings,
    )
    .await
}

/// [`init`] with explicit adapters
///
/// Only the first call across the process runs detection; the adapters of
/// any later call are ignored.
pub async fn init_with(
    inspector: Arc<dyn ProcessInspector>,
    runner: Arc<dyn CommandRunner>,
    settings: DetectionSettings,
) -> &'static PlatformRuntime {
    PLATFORM
        .get_or_init(|| async move {
            let detector = PlatformDetector::new(inspector, Arc::clone(&runner), settings);
            let config = Arc::new(detector.detect().await);
            PlatformRuntime {
                executor: PlatformExecutor::new(Arc::clone(&config), runner),
                config,
            }
        })
        .await
}

pub fn is_initialized() -> bool {
    PLATFORM.initialized()
}

/// The initialised runtime, if [`init`] has completed
pub fn runtime() -> Option<&'static PlatformRuntime> {
    PLATFORM.get()
}

/// Cached classification; `Unknown` before initialisation
pub fn get_platform() -> Platform {
    PLATFORM
        .get()
        .map(PlatformRuntime::platform)
        .unwrap_or_default()
}

/// Check that the process-wide config exists and can back a real operation
pub fn validate() -> Result<()> {
    let runtime = PLATFORM.get().ok_or(ValidationError::NotInitialized)?;
    runtime.config.validate()?;
    Ok(())
}

/// Run an allow-listed command against the detected binary
///
/// See [`PlatformExecutor::execute_command`] for the refusal rules.
pub async fn execute_command<S: AsRef<str>>(
    ctx: Option<&CommandContext>,
    args: &[S],
) -> Result<CommandOutput> {
    let runtime = PLATFORM.get().ok_or(ValidationError::NotInitialized)?;
    Ok(runtime.executor.execute_command(ctx, args).await?)
}
