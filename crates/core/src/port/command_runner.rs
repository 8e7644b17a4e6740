// Command Runner Port
// Abstraction for spawning the platform binary as a child process

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::output::EXIT_CODE_UNAVAILABLE;
use crate::domain::{CommandContext, CommandOutput};

/// Failures of an actual subprocess run
///
/// Every variant carries whatever output was captured before the failure.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("context deadline exceeded")]
    DeadlineExceeded { output: CommandOutput },

    #[error("failed to spawn {}: {source}", binary.display())]
    SpawnFailed {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
        output: CommandOutput,
    },

    #[error("IO error while running command: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        output: CommandOutput,
    },

    #[error("{}", describe_exit(output.exit_code))]
    NonZeroExit { output: CommandOutput },
}

fn describe_exit(code: i32) -> String {
    if code == EXIT_CODE_UNAVAILABLE {
        "process terminated without an exit status".to_string()
    } else {
        format!("exit status {code}")
    }
}

impl ExecutionError {
    pub fn output(&self) -> &CommandOutput {
        match self {
            ExecutionError::DeadlineExceeded { output }
            | ExecutionError::SpawnFailed { output, .. }
            | ExecutionError::Io { output, .. }
            | ExecutionError::NonZeroExit { output } => output,
        }
    }

    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, ExecutionError::DeadlineExceeded { .. })
    }
}

/// Command Runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns the binary with tokio::process
///
/// Runners do not validate anything: callers go through
/// `PlatformExecutor`, which refuses bad invocations before reaching here.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `binary` with `args`, stdout and stderr captured separately
    ///
    /// # Errors
    /// - ExecutionError::DeadlineExceeded if `ctx` ends before the child exits
    /// - ExecutionError::SpawnFailed if the process cannot be started
    /// - ExecutionError::NonZeroExit if the child exits unsuccessfully
    async fn run(
        &self,
        binary: &Path,
        args: &[String],
        ctx: &CommandContext,
    ) -> Result<CommandOutput, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit 0 with the given stdout
        Stdout(String),
        /// Exit with the given code and stderr
        Exit(i32, String),
        /// Fail to spawn with message
        SpawnFail(String),
        /// Report a deadline with partial stdout
        Deadline(String),
    }

    /// Mock Command Runner that records every spawn
    pub struct MockCommandRunner {
        behavior: Arc<Mutex<MockBehavior>>,
        calls: Arc<Mutex<Vec<(PathBuf, Vec<String>)>>>,
    }

    impl MockCommandRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn with_stdout(stdout: impl Into<String>) -> Self {
            Self::new(MockBehavior::Stdout(stdout.into()))
        }

        pub fn spawn_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Arguments of every recorded spawn, in order
        pub fn recorded_args(&self) -> Vec<Vec<String>> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .map(|(_, args)| args.clone())
                .collect()
        }
    }

    #[async_trait]
    impl CommandRunner for MockCommandRunner {
        async fn run(
            &self,
            binary: &Path,
            args: &[String],
            _ctx: &CommandContext,
        ) -> Result<CommandOutput, ExecutionError> {
            self.calls
                .lock()
                .unwrap()
                .push((binary.to_path_buf(), args.to_vec()));

            let behavior = self.behavior.lock().unwrap().clone();

            match behavior {
                MockBehavior::Stdout(stdout) => Ok(CommandOutput {
                    stdout,
                    stderr: String::new(),
                    exit_code: 0,
                }),
                MockBehavior::Exit(exit_code, stderr) => Err(ExecutionError::NonZeroExit {
                    output: CommandOutput {
                        stdout: String::new(),
                        stderr,
                        exit_code,
                    },
                }),
                MockBehavior::SpawnFail(msg) => Err(ExecutionError::SpawnFailed {
                    binary: binary.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::Other, msg),
                    output: CommandOutput::not_started(),
                }),
                MockBehavior::Deadline(partial) => Err(ExecutionError::DeadlineExceeded {
                    output: CommandOutput {
                        stdout: partial,
                        stderr: String::new(),
                        exit_code: EXIT_CODE_UNAVAILABLE,
                    },
                }),
            }
        }
    }
}
