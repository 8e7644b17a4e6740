// Guarded execution of the detected platform binary

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::application::arguments::validate_command_args;
use crate::application::verifier::verify_binary;
use crate::domain::{CommandContext, CommandOutput, Platform, PlatformConfig};
use crate::error::CommandError;
use crate::port::{CommandRunner, ExecutionError};

/// Runs allow-listed commands against the binary that launched the provider
///
/// Holds the immutable detection result; cheap to clone and safe to share
/// between concurrent callers; each call spawns its own child process.
#[derive(Clone)]
pub struct PlatformExecutor {
    config: Arc<PlatformConfig>,
    runner: Arc<dyn CommandRunner>,
}

impl PlatformExecutor {
    /// Create an executor over a detected configuration
    ///
    /// # Example
    /// ```ignore
    /// let executor = PlatformExecutor::new(config, Arc::new(SubprocessRunner::new()));
    /// let ctx = CommandContext::with_timeout(Duration::from_secs(30));
    /// let output = executor.execute_command(Some(&ctx), &["providers", "schema", "-json"]).await?;
    /// ```
    pub fn new(config: Arc<PlatformConfig>, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    pub fn platform(&self) -> Platform {
        self.config.platform()
    }

    /// Execute the platform binary with `args`
    ///
    /// # Errors
    /// Refusals, all raised before spawning:
    /// - CommandError::UnsupportedPlatform when the platform is a debug server
    /// - CommandError::BinaryNotConfigured when no binary path was detected
    /// - CommandError::NilContext when `ctx` is `None`
    /// - CommandError::InvalidArguments / CommandError::Verification
    ///
    /// Run failures come back as CommandError::Execution carrying the captured
    /// output; use [`CommandError::is_deadline_exceeded`] to tell timeouts apart.
    pub async fn execute_command<S: AsRef<str>>(
        &self,
        ctx: Option<&CommandContext>,
        args: &[S],
    ) -> Result<CommandOutput, CommandError> {
        let platform = self.config.platform();
        if platform.is_debug_server() {
            return Err(CommandError::UnsupportedPlatform(platform));
        }

        let binary = self
            .config
            .binary_path()
            .ok_or(CommandError::BinaryNotConfigured)?;

        let ctx = ctx.ok_or(CommandError::NilContext)?;

        run_platform_command(self.runner.as_ref(), binary, args, ctx).await
    }
}

/// Validate, verify, then hand off to the runner
///
/// Shared by the executor and by detection's `version` probe.
pub(crate) async fn run_platform_command<S: AsRef<str>>(
    runner: &dyn CommandRunner,
    binary: &Path,
    args: &[S],
    ctx: &CommandContext,
) -> Result<CommandOutput, CommandError> {
    validate_command_args(args).map_err(CommandError::InvalidArguments)?;
    verify_binary(binary).map_err(CommandError::Verification)?;

    if ctx.is_done() {
        debug!(binary = %binary.display(), "Context already done, not spawning");
        return Err(ExecutionError::DeadlineExceeded {
            output: CommandOutput::not_started(),
        }
        .into());
    }

    let args: Vec<String> = args.iter().map(|a| a.as_ref().to_owned()).collect();
    Ok(runner.run(binary, &args, ctx).await?)
}
