// Provider Platform Core - Domain Logic & Ports
// NO process-table or subprocess dependencies: those sit behind ports

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use application::{DetectionSettings, PlatformDetector, PlatformExecutor};
pub use domain::{CommandContext, CommandOutput, Platform, PlatformConfig};
pub use error::{CommandError, PlatformError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
