// Domain Layer - Platform classification and execution value types

pub mod config;
pub mod context;
pub mod error;
pub mod output;
pub mod platform;

// Re-exports
pub use config::PlatformConfig;
pub use context::CommandContext;
pub use error::{ArgumentError, DomainError, ValidationError, VerificationError};
pub use output::CommandOutput;
pub use platform::{is_valid_platform, Platform};
