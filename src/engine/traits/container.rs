// ABOUTME: Container operations trait for container engines.
// ABOUTME: Run and join project containers, enumerate and remove them.

use super::sealed::Sealed;
use crate::engine::error::EngineError;
use crate::engine::types::ContainerInfo;
use crate::types::ProjectEntry;
use async_trait::async_trait;

#[async_trait]
pub trait ContainerOps: Sealed + Send + Sync {
    /// Start a throwaway container of the project's compose service with
    /// the terminal attached. Returns when the container exits.
    async fn run_container(&self, project: &ProjectEntry, args: &[String])
    -> Result<(), EngineError>;

    /// Open an interactive session in an already running container.
    async fn join_container(
        &self,
        container: &ContainerInfo,
        args: &[String],
    ) -> Result<(), EngineError>;

    /// All paulenv containers, running or stopped.
    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, EngineError>;

    /// Force-remove a container, stopping it first if needed.
    async fn remove_container(&self, container: &ContainerInfo) -> Result<(), EngineError>;
}
