// ABOUTME: Turns a failed engine operation into a permission or connectivity error.
// ABOUTME: Runs a cheap probe command and inspects its stderr for access markers.

use super::error::{EngineError, Operation};
use super::invoker::{CommandRunner, Invocation};
use super::types::EngineKind;

/// The probe used to tell "cannot access the engine" apart from an
/// ordinary operation failure.
#[derive(Debug, Clone)]
pub struct PermissionProbe {
    pub engine: EngineKind,
    pub program: String,
    pub args: Vec<String>,
    /// Lowercase substrings of probe stderr that mean access was refused.
    pub markers: Vec<&'static str>,
}

impl PermissionProbe {
    pub fn new(engine: EngineKind, program: impl Into<String>, markers: &[&'static str]) -> Self {
        Self {
            engine,
            program: program.into(),
            args: vec!["ps".to_string()],
            markers: markers.to_vec(),
        }
    }

    fn invocation(&self) -> Invocation {
        Invocation::new(&self.program).args(&self.args)
    }

    fn refused(&self, stderr: &str) -> bool {
        let stderr = stderr.to_lowercase();
        self.markers.iter().any(|marker| stderr.contains(marker))
    }
}

/// Probe the engine after an operation failed.
///
/// Returns `None` when the probe succeeds: the engine is reachable, so the
/// original failure stands. Otherwise returns the access-level error that
/// should replace it. A probe stopped by cancellation or its deadline says
/// nothing about access and yields `Cancelled` for `operation`.
pub async fn classify<R>(
    runner: &R,
    probe: &PermissionProbe,
    operation: Operation,
) -> Option<EngineError>
where
    R: CommandRunner + ?Sized,
{
    let invocation = probe.invocation();
    let failure = match runner.run(&invocation).await {
        Ok(output) => match output.into_result(&invocation) {
            Ok(_) => return None,
            Err(failure) => failure,
        },
        Err(failure) => failure,
    };

    if failure.is_cancellation() {
        tracing::debug!(engine = %probe.engine, %operation, "engine probe interrupted");
        return Some(EngineError::Cancelled {
            engine: probe.engine,
            operation,
            source: failure,
        });
    }

    let stderr = failure.stderr().unwrap_or_default().to_string();
    let error = if failure.stderr().is_some() && probe.refused(&stderr) {
        EngineError::PermissionDenied {
            engine: probe.engine,
            stderr,
        }
    } else {
        EngineError::ConnectivityFailure {
            engine: probe.engine,
            source: failure,
            stderr,
        }
    };

    tracing::warn!(engine = %probe.engine, "engine probe failed, reporting: {}", error);
    Some(error)
}
