// ABOUTME: DockerEngine struct and trait implementations.
// ABOUTME: Drives the docker CLI and `docker compose` for paulenv projects.

use crate::config::BackendSettings;
use crate::engine::error::{EngineError, Operation};
use crate::engine::invoker::{CommandRunner, SystemRunner};
use crate::engine::tool::EngineTool;
use crate::engine::traits::sealed::Sealed;
use crate::engine::traits::{ContainerOps, EngineInfoOps, ImageOps, NetworkOps, VolumeOps};
use crate::engine::types::{
    ContainerInfo, EngineInfo, EngineKind, ImageInfo, NetworkInfo, VolumeInfo,
};
use crate::types::{ProjectEntry, naming};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Docker version ([0-9]+\.[0-9]+\.[0-9]+)").expect("version pattern is valid")
});

/// Stderr fragments of `docker ps` meaning the caller may not use the daemon.
pub const ACCESS_MARKERS: &[&str] = &[
    "permission denied",
    "access denied",
    "cannot connect to the docker daemon",
    "is the docker daemon running",
];

/// Docker backend.
#[derive(Debug, Clone)]
pub struct DockerEngine<R = SystemRunner> {
    tool: EngineTool<R>,
}

impl<R: CommandRunner> DockerEngine<R> {
    pub fn new(runner: R, settings: BackendSettings) -> Self {
        Self {
            tool: EngineTool::new(EngineKind::Docker, runner, settings, ACCESS_MARKERS),
        }
    }

    pub fn settings(&self) -> &BackendSettings {
        self.tool.settings()
    }
}

impl<R> Sealed for DockerEngine<R> {}

#[async_trait]
impl<R: CommandRunner> ImageOps for DockerEngine<R> {
    async fn build_image(
        &self,
        project: &ProjectEntry,
        dotfiles_dir: &Path,
    ) -> Result<(), EngineError> {
        self.tool.build(project, dotfiles_dir).await
    }

    async fn has_been_built(&self, project_name: &str) -> Result<bool, EngineError> {
        self.tool.image_exists(project_name).await
    }

    async fn get_image_info(&self, project_name: &str) -> Result<ImageInfo, EngineError> {
        self.tool.image_info(project_name).await
    }

    async fn list_images(&self) -> Result<Vec<ImageInfo>, EngineError> {
        self.tool.list_images().await
    }

    async fn remove_image(&self, image: &ImageInfo) -> Result<(), EngineError> {
        self.tool.remove_image(image).await
    }

    /// BuildKit keeps its cache outside the image store.
    async fn prune_build_cache(&self) -> Result<(), EngineError> {
        let label = format!("label={}", naming::MANAGEMENT_LABEL);
        let invocation = self
            .tool
            .command()
            .args(["builder", "prune", "-f", "--filter", label.as_str()]);
        self.tool.execute(Operation::PruneBuildCache, invocation).await
    }
}

#[async_trait]
impl<R: CommandRunner> ContainerOps for DockerEngine<R> {
    async fn run_container(
        &self,
        project: &ProjectEntry,
        args: &[String],
    ) -> Result<(), EngineError> {
        self.tool.run(project, args).await
    }

    async fn join_container(
        &self,
        container: &ContainerInfo,
        args: &[String],
    ) -> Result<(), EngineError> {
        self.tool.join(container, args).await
    }

    async fn list_containers(&self) -> Result<Vec<ContainerInfo>, EngineError> {
        self.tool.list_containers().await
    }

    async fn remove_container(&self, container: &ContainerInfo) -> Result<(), EngineError> {
        self.tool.remove_container(container).await
    }
}

#[async_trait]
impl<R: CommandRunner> VolumeOps for DockerEngine<R> {
    async fn create_volume(&self, name: &str) -> Result<(), EngineError> {
        self.tool.create_volume(name).await
    }

    async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, EngineError> {
        self.tool.list_volumes().await
    }

    async fn remove_volume(&self, volume: &VolumeInfo) -> Result<(), EngineError> {
        self.tool.remove_volume(volume).await
    }
}

#[async_trait]
impl<R: CommandRunner> NetworkOps for DockerEngine<R> {
    async fn list_networks(&self) -> Result<Vec<NetworkInfo>, EngineError> {
        self.tool.list_networks().await
    }

    async fn remove_network(&self, network: &NetworkInfo) -> Result<(), EngineError> {
        self.tool.remove_network(network).await
    }
}

#[async_trait]
impl<R: CommandRunner> EngineInfoOps for DockerEngine<R> {
    fn kind(&self) -> EngineKind {
        self.tool.kind()
    }

    async fn info(&self) -> Result<EngineInfo, EngineError> {
        self.tool.version(&VERSION_PATTERN).await
    }
}
