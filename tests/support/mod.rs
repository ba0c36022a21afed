// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted command runner standing in for engine CLIs.

use async_trait::async_trait;
use parking_lot::Mutex;
use paulenv::engine::{CommandRunner, Invocation, InvocationError, InvocationOutput};
use std::sync::{Arc, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("paulenv=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// What a scripted command does when invoked.
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub enum Reply {
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The program could not be started (not on PATH).
    SpawnFailure,
    /// The invocation was interrupted by the cancel token.
    Cancelled,
}

#[allow(dead_code)]
impl Reply {
    pub fn ok(stdout: &str) -> Self {
        Reply::Exit {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn fail(code: i32, stderr: &str) -> Self {
        Reply::Exit {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    fn respond(&self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError> {
        match self {
            Reply::Exit {
                code,
                stdout,
                stderr,
            } => Ok(InvocationOutput {
                code: Some(*code),
                stdout: stdout.clone(),
                stderr: stderr.clone(),
            }),
            Reply::SpawnFailure => Err(InvocationError::Spawn {
                program: invocation.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }),
            Reply::Cancelled => Err(InvocationError::Cancelled {
                command: invocation.command_line(),
            }),
        }
    }
}

/// A `CommandRunner` answering from a script instead of spawning processes.
///
/// Rules match on the leading words of `program args...`; the longest
/// matching rule wins. Unmatched invocations succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<(Vec<String>, Reply)>,
    calls: Mutex<Vec<Invocation>>,
}

#[allow(dead_code)]
impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, command: &str, reply: Reply) -> Self {
        let words = command.split_whitespace().map(str::to_string).collect();
        self.rules.push((words, reply));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Every invocation seen so far, in order.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().clone()
    }

    /// Command lines of every invocation seen so far.
    pub fn command_lines(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::command_line).collect()
    }

    fn reply_for(&self, invocation: &Invocation) -> Reply {
        let words: Vec<&str> = std::iter::once(invocation.program.as_str())
            .chain(invocation.args.iter().map(String::as_str))
            .collect();
        self.rules
            .iter()
            .filter(|(prefix, _)| {
                prefix.len() <= words.len() && prefix.iter().zip(&words).all(|(a, b)| a.as_str() == *b)
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, reply)| reply.clone())
            .unwrap_or_else(|| Reply::ok(""))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError> {
        self.calls.lock().push(invocation.clone());
        self.reply_for(invocation).respond(invocation)
    }
}
