// Platform classification

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

pub const TERRAFORM_REGISTRY: &str = "registry.terraform.io";

pub const OPENTOFU_REGISTRY: &str = "registry.opentofu.org";

/// Kind of binary driving the provider process
///
/// The integer tags are stable (0..=3) and match the order the variants are
/// declared in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    #[default]
    Unknown,
    Terraform,
    #[serde(rename = "tofu")]
    OpenTofu,
    DebugServer,
}

impl Platform {
    /// Stable lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Terraform => "terraform",
            Platform::OpenTofu => "tofu",
            Platform::DebugServer => "debug-server",
            Platform::Unknown => "unknown",
        }
    }

    pub fn is_debug_server(&self) -> bool {
        matches!(self, Platform::DebugServer)
    }

    /// Canonical registry host the platform resolves providers from
    ///
    /// Empty for `DebugServer` and `Unknown`.
    pub fn provider_registry(&self) -> &'static str {
        match self {
            Platform::Terraform => TERRAFORM_REGISTRY,
            Platform::OpenTofu => OPENTOFU_REGISTRY,
            Platform::DebugServer | Platform::Unknown => "",
        }
    }

    /// Integer tag of the variant
    pub fn as_i32(&self) -> i32 {
        match self {
            Platform::Unknown => 0,
            Platform::Terraform => 1,
            Platform::OpenTofu => 2,
            Platform::DebugServer => 3,
        }
    }
}

/// Whether `platform` is one of the recognised execution platforms
///
/// `Unknown` is not a recognised platform: it marks a failed detection.
pub fn is_valid_platform(platform: Platform) -> bool {
    matches!(
        platform,
        Platform::Terraform | Platform::OpenTofu | Platform::DebugServer
    )
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<i32> for Platform {
    type Error = DomainError;

    fn try_from(tag: i32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Platform::Unknown),
            1 => Ok(Platform::Terraform),
            2 => Ok(Platform::OpenTofu),
            3 => Ok(Platform::DebugServer),
            other => Err(DomainError::InvalidPlatformTag(other)),
        }
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terraform" => Ok(Platform::Terraform),
            "tofu" | "opentofu" => Ok(Platform::OpenTofu),
            "debug-server" => Ok(Platform::DebugServer),
            "unknown" => Ok(Platform::Unknown),
            other => Err(DomainError::InvalidPlatformName(other.to_string())),
        }
    }
}
