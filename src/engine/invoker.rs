// ABOUTME: Runs engine command-line tools as child processes.
// ABOUTME: Captures or inherits stdio, overlays environment, honours cancellation and deadlines.

use async_trait::async_trait;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::sync::Notify;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// stdin closed, stdout and stderr captured.
    #[default]
    Captured,
    /// stdin closed, stdout and stderr streamed to the caller's terminal.
    Streamed,
    /// All three streams inherited; the child owns the terminal.
    Interactive,
}

/// A single engine tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    /// Variables added on top of the caller's environment.
    pub env: Vec<(String, String)>,
    pub stdio: StdioMode,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            stdio: StdioMode::default(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn stdio(mut self, mode: StdioMode) -> Self {
        self.stdio = mode;
        self
    }

    /// Program and arguments joined with spaces, for messages and logs.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a child process that ran to completion.
///
/// Streams that were not captured come back empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InvocationOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl InvocationOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turn a non-zero exit into [`InvocationError::Exited`].
    pub fn into_result(self, invocation: &Invocation) -> Result<Self, InvocationError> {
        if self.success() {
            Ok(self)
        } else {
            Err(InvocationError::Exited {
                command: invocation.command_line(),
                code: self.code,
                stderr: self.stderr,
            })
        }
    }
}

/// Errors from running an engine tool.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    #[error("failed to invoke `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed waiting for `{program}`: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}{}", exit_description(.code), stderr_suffix(.stderr))]
    Exited {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` was cancelled")]
    Cancelled { command: String },

    #[error("`{command}` timed out after {}", seconds(.after))]
    TimedOut { command: String, after: Duration },
}

impl InvocationError {
    /// Exit code of a process that ran and failed.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            InvocationError::Exited { code, .. } => *code,
            _ => None,
        }
    }

    /// Captured stderr of a process that ran and failed.
    pub fn stderr(&self) -> Option<&str> {
        match self {
            InvocationError::Exited { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Whether the invocation was stopped by cancellation or its deadline.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            InvocationError::Cancelled { .. } | InvocationError::TimedOut { .. }
        )
    }
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn seconds(after: &Duration) -> String {
    format!("{:.1}s", after.as_secs_f64())
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Cooperative cancellation shared between a caller and its runner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<CancelState>);

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        if !self.0.cancelled.swap(true, Ordering::AcqRel) {
            self.0.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.cancelled.load(Ordering::Acquire)
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let notified = self.0.notify.notified();
        tokio::pin!(notified);
        // Register before checking the flag so a concurrent cancel is not missed.
        notified.as_mut().enable();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Executes invocations. Engines are generic over this seam.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run to completion. A non-zero exit is still `Ok`; the caller decides
    /// what the exit code means.
    async fn run(&self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError>;
}

#[async_trait]
impl<R: CommandRunner + ?Sized> CommandRunner for Arc<R> {
    async fn run(&self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError> {
        (**self).run(invocation).await
    }
}

/// Runs invocations as real child processes.
///
/// The deadline applies to captured invocations only; builds and interactive
/// sessions run for as long as they need. The cancel token applies to all.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    cancel: CancelToken,
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    fn command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command
            .args(&invocation.args)
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true);

        match invocation.stdio {
            StdioMode::Captured => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
            StdioMode::Streamed => {
                command
                    .stdin(Stdio::null())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            StdioMode::Interactive => {
                command
                    .stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
        }

        // Interactive children must stay in the terminal's foreground group.
        #[cfg(unix)]
        {
            if invocation.stdio != StdioMode::Interactive {
                command.process_group(0);
            }
        }

        command
    }
}

enum Outcome {
    Exited(std::io::Result<std::process::ExitStatus>, (String, String)),
    Cancelled,
    TimedOut(Duration),
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError> {
        let command_line = invocation.command_line();
        tracing::debug!(command = %command_line, stdio = ?invocation.stdio, "invoking engine tool");

        if self.cancel.is_cancelled() {
            return Err(InvocationError::Cancelled {
                command: command_line,
            });
        }

        let mut child =
            Self::command(invocation)
                .spawn()
                .map_err(|source| InvocationError::Spawn {
                    program: invocation.program.clone(),
                    source,
                })?;

        // The group id outlives the reaped child; helpers it forked may
        // still hold the pipes open.
        let pid = child.id();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let deadline = match invocation.stdio {
            StdioMode::Captured => self.timeout,
            StdioMode::Streamed | StdioMode::Interactive => None,
        };

        let outcome = {
            let finished = async { tokio::join!(child.wait(), collect_output(stdout, stderr)) };
            tokio::select! {
                (status, streams) = finished => Outcome::Exited(status, streams),
                _ = self.cancel.cancelled() => Outcome::Cancelled,
                after = expire(deadline) => Outcome::TimedOut(after),
            }
        };

        match outcome {
            Outcome::Exited(status, (stdout, stderr)) => {
                let status = status.map_err(|source| InvocationError::Wait {
                    program: invocation.program.clone(),
                    source,
                })?;
                tracing::debug!(command = %command_line, code = ?status.code(), "engine tool exited");
                Ok(InvocationOutput {
                    code: status.code(),
                    stdout,
                    stderr,
                })
            }
            Outcome::Cancelled => {
                terminate(&mut child, pid, invocation.stdio).await;
                Err(InvocationError::Cancelled {
                    command: command_line,
                })
            }
            Outcome::TimedOut(after) => {
                terminate(&mut child, pid, invocation.stdio).await;
                Err(InvocationError::TimedOut {
                    command: command_line,
                    after,
                })
            }
        }
    }
}

async fn expire(deadline: Option<Duration>) -> Duration {
    match deadline {
        Some(after) => {
            tokio::time::sleep(after).await;
            after
        }
        None => std::future::pending().await,
    }
}

async fn collect_output(
    stdout: Option<tokio::process::ChildStdout>,
    stderr: Option<tokio::process::ChildStderr>,
) -> (String, String) {
    tokio::join!(read_pipe(stdout), read_pipe(stderr))
}

async fn read_pipe<R: AsyncRead + Unpin>(pipe: Option<R>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe
        && let Err(e) = pipe.read_to_end(&mut buf).await
    {
        tracing::debug!("failed reading child output: {}", e);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Stop a child and, unless it shares the terminal, everything it spawned.
async fn terminate(child: &mut Child, pid: Option<u32>, stdio: StdioMode) {
    #[cfg(unix)]
    {
        if stdio != StdioMode::Interactive
            && let Some(pid) = pid
        {
            // SAFETY: killpg only sends a signal to the process group created
            // for this child; it does not touch memory.
            unsafe {
                libc::killpg(pid as libc::pid_t, libc::SIGTERM);
            }
        }
    }
    #[cfg(not(unix))]
    let _ = (pid, stdio);

    if let Err(e) = child.kill().await {
        tracing::debug!("failed to kill engine tool: {}", e);
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Instant;

    fn sh(script: &str) -> Invocation {
        Invocation::new("sh").args(["-c", script])
    }

    #[tokio::test]
    async fn captures_output_and_exit_code() {
        let output = SystemRunner::new()
            .run(&sh("echo hello; echo oops >&2; exit 3"))
            .await
            .unwrap();

        assert_eq!(output.code, Some(3));
        assert_eq!(output.stdout, "hello\n");
        assert_eq!(output.stderr, "oops\n");
        assert!(!output.success());
    }

    #[tokio::test]
    async fn overlays_environment() {
        let invocation =
            sh("printf %s \"$PAULENV_INVOKER_TEST\"").env("PAULENV_INVOKER_TEST", "overlay");
        let output = SystemRunner::new().run(&invocation).await.unwrap();

        assert!(output.success());
        assert_eq!(output.stdout, "overlay");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = SystemRunner::new()
            .run(&Invocation::new("paulenv-no-such-tool-on-path"))
            .await
            .unwrap_err();

        assert!(matches!(err, InvocationError::Spawn { .. }), "got {err:?}");
        assert!(!err.is_cancellation());
    }

    #[tokio::test]
    async fn cancellation_stops_the_child() {
        let token = CancelToken::new();
        let runner = SystemRunner::new().with_cancel_token(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            token.cancel();
        });

        let started = Instant::now();
        let err = runner.run(&sh("sleep 5")).await.unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, InvocationError::Cancelled { .. }), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn pre_cancelled_token_skips_spawning() {
        let token = CancelToken::new();
        token.cancel();
        let runner = SystemRunner::new().with_cancel_token(token);

        let err = runner
            .run(&Invocation::new("paulenv-no-such-tool-on-path"))
            .await
            .unwrap_err();

        assert!(matches!(err, InvocationError::Cancelled { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn deadline_applies_to_captured_invocations() {
        let runner = SystemRunner::new().with_timeout(Some(Duration::from_millis(100)));

        let err = runner.run(&sh("sleep 5")).await.unwrap_err();

        assert!(matches!(err, InvocationError::TimedOut { .. }), "got {err:?}");
        assert!(err.is_cancellation());
    }

    #[tokio::test]
    async fn deadline_covers_helpers_holding_the_pipes() {
        let runner = SystemRunner::new().with_timeout(Some(Duration::from_millis(200)));

        let started = Instant::now();
        let err = runner.run(&sh("sleep 3 & echo hi")).await.unwrap_err();

        assert!(matches!(err, InvocationError::TimedOut { .. }), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn cancellation_covers_helpers_holding_the_pipes() {
        let token = CancelToken::new();
        let runner = SystemRunner::new().with_cancel_token(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            token.cancel();
        });

        let started = Instant::now();
        let err = runner.run(&sh("sleep 3 & echo hi")).await.unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, InvocationError::Cancelled { .. }), "got {err:?}");
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn into_result_reports_exit_and_stderr() {
        let invocation = Invocation::new("podman").args(["volume", "rm", "x"]);
        let output = InvocationOutput {
            code: Some(2),
            stdout: String::new(),
            stderr: "no such volume x\n".to_string(),
        };

        let err = output.into_result(&invocation).unwrap_err();

        assert_eq!(err.exit_code(), Some(2));
        assert_eq!(err.stderr(), Some("no such volume x\n"));
        assert_eq!(
            err.to_string(),
            "`podman volume rm x` exited with status 2: no such volume x"
        );
    }

    #[test]
    fn command_line_joins_program_and_args() {
        let invocation = Invocation::new("docker").args(["ps", "-a"]);
        assert_eq!(invocation.command_line(), "docker ps -a");
    }

    #[tokio::test]
    async fn cancel_token_is_visible_across_clones() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        a.cancel();
        assert!(b.is_cancelled());
        b.cancelled().await;
    }
}
