// Captured result of one platform command invocation

use serde::Serialize;

/// Exit code reported when a child never reached an exit state
pub const EXIT_CODE_UNAVAILABLE: i32 = -1;

/// Output of a single subprocess run
///
/// `exit_code` is [`EXIT_CODE_UNAVAILABLE`] when the child never reached a
/// reportable exit state (spawn failure, killed by a signal, never started).
///
/// Streams are decoded lossily: invalid UTF-8 bytes become U+FFFD. terraform
/// and tofu write UTF-8, so in practice this is the full captured text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    /// Output for a process that never produced anything
    pub fn not_started() -> Self {
        Self {
            stdout: String::new(),
            stderr: String::new(),
            exit_code: EXIT_CODE_UNAVAILABLE,
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl Default for CommandOutput {
    fn default() -> Self {
        Self::not_started()
    }
}
