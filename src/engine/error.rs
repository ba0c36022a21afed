// ABOUTME: Engine error types with SNAFU pattern.
// ABOUTME: Separates permission/connectivity faults from per-operation failures.

use snafu::Snafu;
use std::fmt;

use super::invoker::InvocationError;
use super::types::EngineKind;

/// The engine operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Build,
    Run,
    Join,
    InspectImage,
    Version,
    CreateVolume,
    RemoveContainer,
    RemoveVolume,
    RemoveNetwork,
    RemoveImage,
    PruneBuildCache,
    ListImages,
    ListContainers,
    ListVolumes,
    ListNetworks,
    Detect,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Build => "build",
            Operation::Run => "run",
            Operation::Join => "join",
            Operation::InspectImage => "image inspect",
            Operation::Version => "version query",
            Operation::CreateVolume => "volume creation",
            Operation::RemoveContainer => "container removal",
            Operation::RemoveVolume => "volume removal",
            Operation::RemoveNetwork => "network removal",
            Operation::RemoveImage => "image removal",
            Operation::PruneBuildCache => "build cache prune",
            Operation::ListImages => "image listing",
            Operation::ListContainers => "container listing",
            Operation::ListVolumes => "volume listing",
            Operation::ListNetworks => "network listing",
            Operation::Detect => "compose detection",
        };
        f.write_str(name)
    }
}

/// Errors returned by every `ContainerEngine` operation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum EngineError {
    /// An inspected resource does not exist.
    #[snafu(display("{target} not found"))]
    NotFound {
        target: String,
        source: InvocationError,
    },

    /// The engine refused access (socket permissions, daemon access).
    #[snafu(display("permission denied. Please check {engine} socket permissions"))]
    PermissionDenied { engine: EngineKind, stderr: String },

    /// The engine could not be reached at all.
    #[snafu(display("failed to connect to {engine}: {source}"))]
    ConnectivityFailure {
        engine: EngineKind,
        source: InvocationError,
        stderr: String,
    },

    #[snafu(display("{engine} {operation} failed: {source}"))]
    OperationFailed {
        engine: EngineKind,
        operation: Operation,
        source: InvocationError,
    },

    #[snafu(display("failed to obtain {engine} version, unknown version format: {output}"))]
    UnparseableOutput { engine: EngineKind, output: String },

    #[snafu(display("{engine} {operation} interrupted: {source}"))]
    Cancelled {
        engine: EngineKind,
        operation: Operation,
        source: InvocationError,
    },

    #[snafu(display("no container engine found (checked {})", list_kinds(tried)))]
    Unavailable { tried: Vec<EngineKind> },
}

fn list_kinds(kinds: &[EngineKind]) -> String {
    kinds
        .iter()
        .map(|k| format!("{k} compose"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    NotFound,
    PermissionDenied,
    ConnectivityFailure,
    OperationFailed,
    UnparseableOutput,
    Cancelled,
    Unavailable,
}

impl EngineError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> EngineErrorKind {
        match self {
            EngineError::NotFound { .. } => EngineErrorKind::NotFound,
            EngineError::PermissionDenied { .. } => EngineErrorKind::PermissionDenied,
            EngineError::ConnectivityFailure { .. } => EngineErrorKind::ConnectivityFailure,
            EngineError::OperationFailed { .. } => EngineErrorKind::OperationFailed,
            EngineError::UnparseableOutput { .. } => EngineErrorKind::UnparseableOutput,
            EngineError::Cancelled { .. } => EngineErrorKind::Cancelled,
            EngineError::Unavailable { .. } => EngineErrorKind::Unavailable,
        }
    }

    /// The failed operation, when the error is operation-specific.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            EngineError::OperationFailed { operation, .. }
            | EngineError::Cancelled { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exited(code: i32, stderr: &str) -> InvocationError {
        InvocationError::Exited {
            command: "podman volume create shared".to_string(),
            code: Some(code),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn permission_denied_names_the_engine() {
        let err = EngineError::PermissionDenied {
            engine: EngineKind::Podman,
            stderr: "permission denied".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "permission denied. Please check podman socket permissions"
        );
        assert_eq!(err.kind(), EngineErrorKind::PermissionDenied);
    }

    #[test]
    fn operation_failure_carries_context() {
        let err = EngineError::OperationFailed {
            engine: EngineKind::Podman,
            operation: Operation::CreateVolume,
            source: exited(125, "volume already exists"),
        };
        assert_eq!(
            err.to_string(),
            "podman volume creation failed: `podman volume create shared` exited with status 125: volume already exists"
        );
        assert_eq!(err.kind(), EngineErrorKind::OperationFailed);
        assert_eq!(err.operation(), Some(Operation::CreateVolume));
    }

    #[test]
    fn unavailable_lists_probed_engines() {
        let err = EngineError::Unavailable {
            tried: vec![EngineKind::Podman, EngineKind::Docker],
        };
        assert_eq!(
            err.to_string(),
            "no container engine found (checked podman compose, docker compose)"
        );
    }

    #[test]
    fn unparseable_version_keeps_output() {
        let err = EngineError::UnparseableOutput {
            engine: EngineKind::Docker,
            output: "garbage".to_string(),
        };
        assert_eq!(err.kind(), EngineErrorKind::UnparseableOutput);
        assert!(err.to_string().ends_with("unknown version format: garbage"));
    }

    #[test]
    fn source_chain_is_preserved() {
        use std::error::Error as _;

        let err = EngineError::ConnectivityFailure {
            engine: EngineKind::Docker,
            source: exited(1, "Cannot connect"),
            stderr: "Cannot connect".to_string(),
        };
        assert!(err.source().is_some());
    }
}
