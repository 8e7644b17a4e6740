// Central Error Types for platform operations

use thiserror::Error;

use crate::domain::{ArgumentError, CommandOutput, Platform, ValidationError, VerificationError};
use crate::port::ExecutionError;

/// Why an `execute_command` call did not produce a successful run
///
/// Everything up to and including `Verification` is raised before any
/// process is spawned.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("cannot execute platform command against {0}")]
    UnsupportedPlatform(Platform),

    #[error("binary path is empty")]
    BinaryNotConfigured,

    #[error("nil context provided")]
    NilContext,

    #[error("invalid arguments: {0}")]
    InvalidArguments(#[source] ArgumentError),

    #[error("binary verification failed: {0}")]
    Verification(#[source] VerificationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),
}

impl CommandError {
    /// The context ended (deadline or cancellation) while the command ran
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, CommandError::Execution(e) if e.is_deadline_exceeded())
    }

    /// Output captured before the failure, if a run was attempted
    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            CommandError::Execution(e) => Some(e.output()),
            _ => None,
        }
    }
}

/// Application-level error type
///
/// Detection failures never appear here: they degrade to `Unknown`.
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

impl PlatformError {
    pub fn is_deadline_exceeded(&self) -> bool {
        matches!(self, PlatformError::Command(e) if e.is_deadline_exceeded())
    }

    pub fn output(&self) -> Option<&CommandOutput> {
        match self {
            PlatformError::Command(e) => e.output(),
            _ => None,
        }
    }
}

/// Result type alias using PlatformError
pub type Result<T> = std::result::Result<T, PlatformError>;
