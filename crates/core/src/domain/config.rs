// Detected platform configuration (immutable once built)

use serde::Serialize;
use std::path::{Path, PathBuf};

use super::error::ValidationError;
use super::platform::{is_valid_platform, Platform};

/// Result of platform detection for this process
///
/// Built once by detection and shared read-only (`Arc<PlatformConfig>`)
/// with every component that needs it. A config whose platform is
/// `Unknown` is a permanent degraded state, it is never rebuilt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformConfig {
    platform: Platform,
    binary_path: Option<PathBuf>,
    /// Reserved; detection never populates it
    provider_addr: Option<String>,
}

impl PlatformConfig {
    /// An empty path is stored as "no path"
    pub fn new(platform: Platform, binary_path: Option<PathBuf>) -> Self {
        Self {
            platform,
            binary_path: binary_path.filter(|p| !p.as_os_str().is_empty()),
            provider_addr: None,
        }
    }

    /// Degraded config: nothing could be resolved
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Full path of the detected binary
    pub fn binary_path(&self) -> Option<&Path> {
        self.binary_path.as_deref()
    }

    /// Basename of the detected binary, empty when no path was resolved
    pub fn binary(&self) -> String {
        self.binary_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn provider_addr(&self) -> Option<&str> {
        self.provider_addr.as_deref()
    }

    pub fn is_debug_server(&self) -> bool {
        self.platform.is_debug_server()
    }

    pub fn provider_registry(&self) -> &'static str {
        self.platform.provider_registry()
    }

    /// Check the config can back a real operation
    ///
    /// Must be called before relying on [`binary_path`](Self::binary_path)
    /// or [`binary`](Self::binary).
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !is_valid_platform(self.platform) {
            return Err(ValidationError::InvalidPlatform(self.platform));
        }
        if self.binary_path.is_none() {
            return Err(ValidationError::MissingBinaryPath);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_basename() {
        let config = PlatformConfig::new(
            Platform::Terraform,
            Some(PathBuf::from("/usr/local/bin/terraform")),
        );
        assert_eq!(config.binary(), "terraform");
        assert_eq!(
            config.binary_path(),
            Some(Path::new("/usr/local/bin/terraform"))
        );
    }

    #[test]
    fn test_empty_path_is_no_path() {
        let config = PlatformConfig::new(Platform::Terraform, Some(PathBuf::new()));
        assert!(config.binary_path().is_none());
        assert_eq!(config.binary(), "");
        assert_eq!(config.validate(), Err(ValidationError::MissingBinaryPath));
    }

    #[test]
    fn test_validate_rejects_unknown_platform() {
        let config = PlatformConfig::new(Platform::Unknown, Some(PathBuf::from("/bin/sh")));
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidPlatform(Platform::Unknown))
        );
    }

    #[test]
    fn test_validate_accepts_detected_platforms() {
        for platform in [Platform::Terraform, Platform::OpenTofu, Platform::DebugServer] {
            let config = PlatformConfig::new(platform, Some(PathBuf::from("/opt/bin/tool")));
            assert!(config.validate().is_ok(), "{platform} should validate");
        }
    }

    #[test]
    fn test_validation_messages_are_actionable() {
        let msg = ValidationError::MissingBinaryPath.to_string();
        assert!(msg.contains("verify your terraform or tofu installation"));
        let msg = ValidationError::InvalidPlatform(Platform::Unknown).to_string();
        assert!(msg.starts_with("Invalid platform value detected: unknown."));
    }

    #[test]
    fn test_unknown_config_is_degraded() {
        let config = PlatformConfig::unknown();
        assert_eq!(config.platform(), Platform::Unknown);
        assert!(config.binary_path().is_none());
        assert!(config.provider_addr().is_none());
        assert_eq!(config.provider_registry(), "");
    }
}
