// Cancellation context for command execution

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation scope for one or more command executions
///
/// A context is done once it has been cancelled or its deadline has passed.
/// Clones share the same cancellation token; [`CommandContext::child`]
/// derives a context that is cancelled with its parent but can also be
/// cancelled on its own.
#[derive(Debug, Clone)]
pub struct CommandContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CommandContext {
    /// Context with no deadline, only ended by [`CommandContext::cancel`]
    pub fn background() -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: None,
        }
    }

    /// Context ending `timeout` from now
    ///
    /// A timeout too large to represent as an instant means no deadline.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            token: CancellationToken::new(),
            deadline: Some(deadline),
        }
    }

    /// Derive a context bounded by both the parent and `timeout`
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let own = Instant::now().checked_add(timeout);
        let deadline = match (self.deadline, own) {
            (Some(parent), Some(own)) => Some(parent.min(own)),
            (parent, own) => parent.or(own),
        };
        Self {
            token: self.token.child_token(),
            deadline,
        }
    }

    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn deadline_exceeded(&self) -> bool {
        self.deadline.is_some_and(|deadline| Instant::now() >= deadline)
    }

    pub fn is_done(&self) -> bool {
        self.is_cancelled() || self.deadline_exceeded()
    }

    /// Resolves once the context is cancelled or its deadline passes
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.token.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.token.cancelled().await,
        }
    }
}

impl Default for CommandContext {
    fn default() -> Self {
        Self::background()
    }
}
