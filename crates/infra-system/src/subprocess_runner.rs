// Subprocess runner implementation
// reason: tokio::process so the caller's context can abort a running child
use async_trait::async_trait;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{info, warn};

use tfplatform_core::domain::output::EXIT_CODE_UNAVAILABLE;
use tfplatform_core::domain::{CommandContext, CommandOutput};
use tfplatform_core::port::{CommandRunner, ExecutionError};

/// How long to keep collecting output after a child was killed
///
/// Grandchildren can hold the pipes open past the child's death; whatever
/// arrived by then is returned as partial output.
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_millis(250);

const READ_CHUNK_SIZE: usize = 8 * 1024;

type CaptureBuffer = Arc<Mutex<Vec<u8>>>;

/// Subprocess runner
///
/// Spawns the binary with the provider's environment, stdin closed, and
/// stdout/stderr captured into separate buffers.
pub struct SubprocessRunner {
    drain_grace: Duration,
}

impl SubprocessRunner {
    /// Create a new subprocess runner
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::new();
    /// let ctx = CommandContext::with_timeout(Duration::from_secs(10));
    /// let output = runner.run(Path::new("/usr/bin/terraform"), &["version".into()], &ctx).await?;
    /// ```
    pub fn new() -> Self {
        Self {
            drain_grace: OUTPUT_DRAIN_GRACE,
        }
    }

    /// Spawn child process and wait for it under `ctx`
    async fn spawn_and_wait(
        &self,
        binary: &Path,
        args: &[String],
        ctx: &CommandContext,
    ) -> Result<CommandOutput, ExecutionError> {
        let mut child = Command::new(binary)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::SpawnFailed {
                binary: binary.to_path_buf(),
                source,
                output: CommandOutput::not_started(),
            })?;

        let stdout = CaptureBuffer::default();
        let stderr = CaptureBuffer::default();
        let mut readers = Vec::with_capacity(2);
        if let Some(pipe) = child.stdout.take() {
            readers.push(tokio::spawn(capture(pipe, stdout.clone())));
        }
        if let Some(pipe) = child.stderr.take() {
            readers.push(tokio::spawn(capture(pipe, stderr.clone())));
        }

        let waited = tokio::select! {
            status = child.wait() => Some(status),
            _ = ctx.done() => None,
        };

        match waited {
            Some(Ok(status)) => {
                let exit_code = status.code().unwrap_or(EXIT_CODE_UNAVAILABLE);

                let drained = tokio::select! {
                    result = drain(readers) => Some(result),
                    _ = ctx.done() => None,
                };
                let output = snapshot(&stdout, &stderr, exit_code);

                match drained {
                    None => Err(ExecutionError::DeadlineExceeded { output }),
                    Some(Err(source)) => Err(ExecutionError::Io { source, output }),
                    Some(Ok(())) if status.success() => Ok(output),
                    Some(Ok(())) => Err(ExecutionError::NonZeroExit { output }),
                }
            }
            Some(Err(source)) => {
                let output = snapshot(&stdout, &stderr, EXIT_CODE_UNAVAILABLE);
                Err(ExecutionError::Io { source, output })
            }
            None => {
                warn!(
                    binary = %binary.display(),
                    cancelled = ctx.is_cancelled(),
                    "Context done before platform command exited, killing child"
                );
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill platform command");
                }
                let exit_code = child
                    .try_wait()
                    .ok()
                    .flatten()
                    .and_then(|status| status.code())
                    .unwrap_or(EXIT_CODE_UNAVAILABLE);

                // Partial output is all we want here; a reader error changes nothing
                let _ = timeout(self.drain_grace, drain(readers)).await;

                Err(ExecutionError::DeadlineExceeded {
                    output: snapshot(&stdout, &stderr, exit_code),
                })
            }
        }
    }
}

impl Default for SubprocessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for SubprocessRunner {
    async fn run(
        &self,
        binary: &Path,
        args: &[String],
        ctx: &CommandContext,
    ) -> Result<CommandOutput, ExecutionError> {
        if ctx.is_done() {
            return Err(ExecutionError::DeadlineExceeded {
                output: CommandOutput::not_started(),
            });
        }

        let start_time = Instant::now();

        info!(
            command = %command_line(binary, args),
            "Running command against platform binary"
        );

        let result = self.spawn_and_wait(binary, args, ctx).await;

        let output = match &result {
            Ok(output) => output,
            Err(e) => e.output(),
        };
        info!(
            binary = %binary.display(),
            duration_ms = %start_time.elapsed().as_millis(),
            exit_code = %output.exit_code,
            ok = %result.is_ok(),
            "Platform command finished"
        );

        result
    }
}

/// Render the command line the way it will be spawned
pub fn command_line(binary: &Path, args: &[String]) -> String {
    let mut line = binary.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}

/// Copy a pipe into a shared buffer chunk by chunk
///
/// The buffer is shared so a killed run can still report what was read.
async fn capture<R>(mut pipe: R, buffer: CaptureBuffer) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut chunk = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let read = pipe.read(&mut chunk).await?;
        if read == 0 {
            return Ok(());
        }
        buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(&chunk[..read]);
    }
}

async fn drain(readers: Vec<JoinHandle<io::Result<()>>>) -> io::Result<()> {
    for reader in readers {
        reader.await.map_err(io::Error::other)??;
    }
    Ok(())
}

fn snapshot(stdout: &CaptureBuffer, stderr: &CaptureBuffer, exit_code: i32) -> CommandOutput {
    let text = |buffer: &CaptureBuffer| {
        let bytes = buffer.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    };

    CommandOutput {
        stdout: text(stdout),
        stderr: text(stderr),
        exit_code,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory log sink for a scoped subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn sh() -> &'static Path {
        Path::new("/bin/sh")
    }

    fn script(body: &str) -> Vec<String> {
        vec!["-c".to_string(), body.to_string()]
    }

    #[tokio::test]
    async fn test_captures_streams_separately() {
        let runner = SubprocessRunner::new();
        let ctx = CommandContext::background();

        let output = assert_ok!(
            runner
                .run(sh(), &script("echo hello; echo oops >&2"), &ctx)
                .await
        );

        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "oops\n");
        assert_eq!(output.exit_code, 0);
    }

    #[tokio::test]
    async fn test_invalid_utf8_replaced_not_dropped() {
        let runner = SubprocessRunner::new();
        let ctx = CommandContext::background();

        let output = assert_ok!(
            runner
                .run(sh(), &script(r"printf 'ok\377done'"), &ctx)
                .await
        );

        assert_eq!(output.stdout, "ok\u{FFFD}done");
    }

    #[tokio::test]
    async fn test_non_zero_exit_keeps_output() {
        let runner = SubprocessRunner::new();
        let ctx = CommandContext::background();

        let result = runner
            .run(sh(), &script("echo failing >&2; exit 3"), &ctx)
            .await;

        match result {
            Err(ExecutionError::NonZeroExit { output }) => {
                assert_eq!(output.exit_code, 3);
                assert_eq!(output.stderr, "failing\n");
            }
            other => panic!("expected non-zero exit, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_output() {
        let runner = SubprocessRunner::new();
        let ctx = CommandContext::with_timeout(Duration::from_millis(300));
        let started = Instant::now();

        let result = runner
            .run(sh(), &script("echo partial; exec sleep 10"), &ctx)
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        match result {
            Err(ExecutionError::DeadlineExceeded { output }) => {
                assert_eq!(output.stdout, "partial\n");
                assert_eq!(output.exit_code, EXIT_CODE_UNAVAILABLE);
            }
            other => panic!("expected deadline, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_grandchild_holding_pipe_does_not_hang() {
        let runner = SubprocessRunner::new();
        let ctx = CommandContext::with_timeout(Duration::from_millis(300));
        let started = Instant::now();

        let result = runner
            .run(sh(), &script("echo early; sleep 10; echo late"), &ctx)
            .await;

        assert!(started.elapsed() < Duration::from_secs(5));
        let err = result.unwrap_err();
        assert!(err.is_deadline_exceeded());
        assert!(err.output().stdout.starts_with("early"));
    }

    #[tokio::test]
    async fn test_cancellation_aborts_child() {
        let runner = SubprocessRunner::new();
        let ctx = CommandContext::background();
        let canceller = ctx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let result = runner.run(sh(), &script("exec sleep 10"), &ctx).await;

        assert!(result.unwrap_err().is_deadline_exceeded());
    }

    #[tokio::test]
    async fn test_spawn_failure_uses_sentinel() {
        let runner = SubprocessRunner::new();
        let ctx = CommandContext::background();

        let result = runner
            .run(Path::new("/nonexistent/terraform"), &[], &ctx)
            .await;

        match result {
            Err(ExecutionError::SpawnFailed { output, .. }) => {
                assert_eq!(output.exit_code, EXIT_CODE_UNAVAILABLE)
            }
            other => panic!("expected spawn failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_done_context_never_spawns() {
        let runner = SubprocessRunner::new();
        let ctx = CommandContext::with_timeout(Duration::ZERO);

        let err = assert_err!(
            runner
                .run(Path::new("/nonexistent/terraform"), &[], &ctx)
                .await
        );

        assert!(err.is_deadline_exceeded());
    }

    #[tokio::test]
    async fn test_command_line_logged_before_spawn() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let runner = SubprocessRunner::new();
        let ctx = CommandContext::background();
        let args = vec!["plan".to_string(), "-out=tfplan".to_string()];

        // Spawn fails, so anything logged about the command came first
        let result = runner
            .run(Path::new("/nonexistent/terraform"), &args, &ctx)
            .await;
        assert!(matches!(result, Err(ExecutionError::SpawnFailed { .. })));

        let text = logs.text();
        let running = text
            .find("Running command against platform binary")
            .expect("command line should be logged");
        let finished = text
            .find("Platform command finished")
            .expect("completion should be logged");
        assert!(running < finished);
        assert!(text.contains("/nonexistent/terraform plan -out=tfplan"));
    }

    #[test]
    fn test_command_line_rendering() {
        let args = vec!["plan".to_string(), "-out=tfplan".to_string()];
        assert_eq!(
            command_line(Path::new("/usr/bin/terraform"), &args),
            "/usr/bin/terraform plan -out=tfplan"
        );
    }
}
