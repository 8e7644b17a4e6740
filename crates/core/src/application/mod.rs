// Application Layer - Detection and guarded execution

pub mod arguments;
pub mod constants;
pub mod detection;
pub mod executor;
pub mod verifier;

// Re-exports
pub use arguments::{is_allowed_command, validate_command_args};
pub use detection::{classify_version_output, DetectionSettings, PlatformDetector};
pub use executor::PlatformExecutor;
pub use verifier::verify_binary;
