// Port Layer - Interfaces for OS-facing dependencies

pub mod command_runner;
pub mod process_inspector;

// Re-exports
pub use command_runner::{CommandRunner, ExecutionError};
pub use process_inspector::{DetectionError, ProcessInspector};
