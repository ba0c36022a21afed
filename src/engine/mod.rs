// ABOUTME: Container engine layer for Podman and Docker.
// ABOUTME: Capability traits, CLI-driven backends, output parsing and detection.

mod classify;
mod detection;
pub mod docker;
mod error;
pub mod invoker;
pub mod parse;
pub mod podman;
mod tool;
pub mod traits;
mod types;

pub use classify::{PermissionProbe, classify};
pub use detection::{DETECTION_ORDER, build_engine, detect_engine};
pub use docker::DockerEngine;
pub use error::{EngineError, EngineErrorKind, Operation};
pub use invoker::{
    CancelToken, CommandRunner, Invocation, InvocationError, InvocationOutput, StdioMode,
    SystemRunner,
};
pub use podman::PodmanEngine;
pub use traits::{ContainerEngine, ContainerOps, EngineInfoOps, ImageOps, NetworkOps, VolumeOps};
pub use types::{
    ContainerInfo, EngineInfo, EngineKind, ImageInfo, NetworkInfo, UnknownEngineKind, VolumeInfo,
};
