// ABOUTME: Engine detection and construction.
// ABOUTME: Probes for a working compose front end, Podman first, then Docker.

use super::docker::DockerEngine;
use super::error::{EngineError, Operation};
use super::invoker::{CommandRunner, Invocation};
use super::podman::PodmanEngine;
use super::traits::ContainerEngine;
use super::types::EngineKind;
use crate::config::{BackendSettings, Settings};

/// Order in which backends are tried when none is configured.
pub const DETECTION_ORDER: [EngineKind; 2] = [EngineKind::Podman, EngineKind::Docker];

/// Find a usable engine and construct it.
///
/// Detection order (when `settings.engine` is unset):
/// 1. `podman compose version`
/// 2. `docker compose version`
///
/// An explicitly configured engine is the only candidate.
pub async fn detect_engine<R>(
    settings: &Settings,
    runner: R,
) -> Result<Box<dyn ContainerEngine>, EngineError>
where
    R: CommandRunner + 'static,
{
    let candidates: Vec<EngineKind> = match settings.engine {
        Some(kind) => vec![kind],
        None => DETECTION_ORDER.to_vec(),
    };

    for &kind in &candidates {
        let backend = settings.backend(kind);
        if compose_available(&runner, kind, backend).await? {
            tracing::info!(engine = %kind, program = %backend.program, "selected container engine");
            return Ok(build_engine(kind, runner, backend.clone()));
        }
        tracing::debug!(engine = %kind, "compose front end unavailable");
    }

    Err(EngineError::Unavailable { tried: candidates })
}

/// Construct the engine for `kind` without probing.
pub fn build_engine<R>(
    kind: EngineKind,
    runner: R,
    settings: BackendSettings,
) -> Box<dyn ContainerEngine>
where
    R: CommandRunner + 'static,
{
    match kind {
        EngineKind::Podman => Box::new(PodmanEngine::new(runner, settings)),
        EngineKind::Docker => Box::new(DockerEngine::new(runner, settings)),
    }
}

async fn compose_available<R: CommandRunner>(
    runner: &R,
    kind: EngineKind,
    backend: &BackendSettings,
) -> Result<bool, EngineError> {
    let invocation = Invocation::new(&backend.program).args(["compose", "version"]);
    match runner.run(&invocation).await {
        Ok(output) => Ok(output.success()),
        Err(e) if e.is_cancellation() => Err(EngineError::Cancelled {
            engine: kind,
            operation: Operation::Detect,
            source: e,
        }),
        Err(e) => {
            tracing::debug!(engine = %kind, "probe failed: {}", e);
            Ok(false)
        }
    }
}
