// Domain Error Types

use std::path::PathBuf;
use thiserror::Error;

use super::Platform;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid platform tag: {0}")]
    InvalidPlatformTag(i32),

    #[error("Invalid platform name: {0:?}")]
    InvalidPlatformName(String),
}

/// Why a platform binary path was rejected
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("binary not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to stat binary {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("binary path {} is a {kind}, not a regular file", path.display())]
    InvalidBinaryKind { path: PathBuf, kind: &'static str },

    #[error("binary {} is not executable", path.display())]
    NotExecutable { path: PathBuf },
}

/// Why an argument list was refused before spawning
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("no arguments provided")]
    NoArguments,

    #[error("command {0:?} is not allowed")]
    DisallowedCommand(String),
}

/// Why a platform configuration cannot be relied on
///
/// Messages are long-form: this is the first thing a user sees when the
/// provider runs in a misconfigured environment.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "Invalid platform value detected: {0}. The provider could not identify a supported \
         Terraform or OpenTofu binary as its parent process. This may indicate the provider is \
         running in an unsupported environment. Please ensure the provider is launched by a \
         supported terraform or tofu installation on a supported operating system and architecture."
    )]
    InvalidPlatform(Platform),

    #[error(
        "Platform configuration is not initialized. This is likely an internal provider error: \
         platform detection must run at process start before any other component. Please file a \
         bug report if this persists."
    )]
    NotInitialized,

    #[error(
        "Unable to determine provider binary path. This may indicate an incorrect provider \
         installation or an unsupported execution environment. Please verify your terraform or \
         tofu installation is complete and that the binary is readable by the current user."
    )]
    MissingBinaryPath,
}
