// Process inspection port
// Abstraction over the OS process table, used once at start-up by detection

use std::path::PathBuf;
use thiserror::Error;

/// Failures while resolving the process that launched the provider
///
/// Never fatal: detection absorbs these into the `Unknown` platform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DetectionError {
    #[error("Current process lookup failed: {0}")]
    CurrentProcess(String),

    #[error("Parent process of pid {0} could not be determined")]
    ParentNotFound(u32),

    #[error("Process {0} not found in process table")]
    ProcessNotFound(u32),

    #[error("Executable path unavailable for process {0} (permission denied or process exited)")]
    ExecutableUnavailable(u32),
}

/// Process inspector trait
///
/// Implementations:
/// - SysinfoProcessInspector: reads the host process table
pub trait ProcessInspector: Send + Sync {
    /// PID of the parent of the current process
    ///
    /// # Errors
    /// - DetectionError::CurrentProcess if the current process cannot be inspected
    /// - DetectionError::ParentNotFound if it has no resolvable parent
    fn parent_pid(&self) -> Result<u32, DetectionError>;

    /// Absolute path of the executable backing `pid`
    ///
    /// # Errors
    /// - DetectionError::ProcessNotFound if `pid` is not in the process table
    /// - DetectionError::ExecutableUnavailable if the path cannot be read
    fn executable_path(&self, pid: u32) -> Result<PathBuf, DetectionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const MOCK_PARENT_PID: u32 = 4242;

    /// Mock ProcessInspector with a fixed answer
    pub struct MockProcessInspector {
        parent: Result<u32, DetectionError>,
        executable: Result<PathBuf, DetectionError>,
        lookups: AtomicUsize,
    }

    impl MockProcessInspector {
        /// Parent resolves to `path`
        pub fn with_parent_executable(path: impl Into<PathBuf>) -> Self {
            Self {
                parent: Ok(MOCK_PARENT_PID),
                executable: Ok(path.into()),
                lookups: AtomicUsize::new(0),
            }
        }

        /// Parent PID lookup fails
        pub fn without_parent() -> Self {
            Self {
                parent: Err(DetectionError::ParentNotFound(std::process::id())),
                executable: Err(DetectionError::ProcessNotFound(0)),
                lookups: AtomicUsize::new(0),
            }
        }

        /// Parent found but its executable path cannot be read
        pub fn with_unreadable_executable() -> Self {
            Self {
                parent: Ok(MOCK_PARENT_PID),
                executable: Err(DetectionError::ExecutableUnavailable(MOCK_PARENT_PID)),
                lookups: AtomicUsize::new(0),
            }
        }

        /// Number of executable path lookups performed
        pub fn lookup_count(&self) -> usize {
            self.lookups.load(Ordering::SeqCst)
        }
    }

    impl ProcessInspector for MockProcessInspector {
        fn parent_pid(&self) -> Result<u32, DetectionError> {
            self.parent.clone()
        }

        fn executable_path(&self, _pid: u32) -> Result<PathBuf, DetectionError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.executable.clone()
        }
    }
}
