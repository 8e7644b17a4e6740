// Platform constants (no magic values)
use std::time::Duration;

/// Upper bound for the `version` probe run during detection (10s)
pub const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Subcommand used to fingerprint the parent binary
pub const VERSION_COMMAND: &str = "version";

/// Case-insensitive marker in `version` output identifying OpenTofu
pub const OPENTOFU_MARKER: &str = "tofu";

/// Case-sensitive substrings of a binary path that mark a debugger or
/// test harness (Delve, debug servers). Heuristic: any path that merely
/// contains "debug" is classified as a debug server too.
pub const DEBUG_PATTERNS: &[&str] = &["dlv", "debug"];

pub use crate::domain::output::EXIT_CODE_UNAVAILABLE;

/// Single leading character stripped from a command before the allow-list check
pub const FLAG_PREFIX: char = '-';

/// Top-level subcommands the executor is allowed to run
pub const ALLOWED_COMMANDS: &[&str] = &[
    "init",
    "plan",
    "apply",
    "destroy",
    "validate",
    "output",
    "show",
    "state",
    "import",
    "version",
    "fmt",
    "force-unlock",
    "providers",
    "login",
    "logout",
    "refresh",
    "graph",
    "taint",
    "untaint",
    "workspace",
    "metadata",
    "test",
    "console",
];

pub use crate::domain::platform::{OPENTOFU_REGISTRY, TERRAFORM_REGISTRY};
