// ABOUTME: Shared command syntax and invoke-classify-wrap plumbing for CLI engine backends.
// ABOUTME: Podman and Docker agree on everything here; backends add prune and version parsing.

use super::classify::{PermissionProbe, classify};
use super::error::{EngineError, Operation};
use super::invoker::{CommandRunner, Invocation, InvocationError, InvocationOutput, StdioMode};
use super::parse;
use super::types::{ContainerInfo, EngineInfo, EngineKind, ImageInfo, NetworkInfo, VolumeInfo};
use crate::config::BackendSettings;
use crate::types::{ProjectEntry, naming};
use regex::Regex;
use std::path::Path;

const IMAGE_FORMAT: &str = "{{.Repository}}:{{.Tag}}\t{{.CreatedAt}}";
const CONTAINER_FORMAT: &str = "{{.ID}}\t{{.Image}}\t{{.Names}}";
const VOLUME_FORMAT: &str = "{{.Name}}";
const NETWORK_FORMAT: &str = "{{.ID}}\t{{.Name}}";

/// `--filter name=paulenv- --format <format>`
fn compose_filter(format: &str) -> [String; 4] {
    [
        "--filter".to_string(),
        format!("name={}", naming::COMPOSE_PROJECT_PREFIX),
        "--format".to_string(),
        format.to_string(),
    ]
}

/// An engine command-line tool plus the runner that executes it.
#[derive(Debug, Clone)]
pub(crate) struct EngineTool<R> {
    kind: EngineKind,
    runner: R,
    settings: BackendSettings,
    probe: PermissionProbe,
}

impl<R: CommandRunner> EngineTool<R> {
    pub(crate) fn new(
        kind: EngineKind,
        runner: R,
        settings: BackendSettings,
        markers: &[&'static str],
    ) -> Self {
        let probe = PermissionProbe::new(kind, &settings.program, markers);
        Self {
            kind,
            runner,
            settings,
            probe,
        }
    }

    pub(crate) fn kind(&self) -> EngineKind {
        self.kind
    }

    pub(crate) fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    /// A fresh invocation of the configured program.
    pub(crate) fn command(&self) -> Invocation {
        Invocation::new(&self.settings.program)
    }

    /// `<tool> compose -f <compose> --env-file <env>` scoped to the project's
    /// compose project name.
    pub(crate) fn compose(&self, project: &ProjectEntry) -> Invocation {
        self.command()
            .arg("compose")
            .arg("-f")
            .arg(project.compose_file().to_string_lossy())
            .arg("--env-file")
            .arg(project.env_file().to_string_lossy())
            .env(naming::COMPOSE_PROJECT_NAME_VAR, project.compose_project_name())
    }

    pub(crate) async fn build(
        &self,
        project: &ProjectEntry,
        dotfiles_dir: &Path,
    ) -> Result<(), EngineError> {
        let invocation = self
            .compose(project)
            .arg("build")
            .env(naming::DOTFILES_DIR_VAR, dotfiles_dir.to_string_lossy())
            .stdio(StdioMode::Streamed);
        self.execute(Operation::Build, invocation).await
    }

    pub(crate) async fn image_exists(&self, project_name: &str) -> Result<bool, EngineError> {
        let reference = naming::image_reference(project_name);
        let invocation = self.command().args(["image", "inspect", reference.as_str()]);
        match self.inspect(&reference, invocation).await {
            Ok(_) => Ok(true),
            Err(EngineError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// A missing image yields a record without a build time.
    pub(crate) async fn image_info(&self, project_name: &str) -> Result<ImageInfo, EngineError> {
        let reference = naming::image_reference(project_name);
        let invocation =
            self.command()
                .args(["image", "inspect", reference.as_str(), "--format", "{{.Created}}"]);
        let built_at = match self.inspect(&reference, invocation).await {
            Ok(created) => parse::rfc3339(&created),
            Err(EngineError::NotFound { .. }) => None,
            Err(e) => return Err(e),
        };
        Ok(ImageInfo {
            image_name: reference,
            project_name: Some(project_name.to_string()),
            built_at,
        })
    }

    pub(crate) async fn list_images(&self) -> Result<Vec<ImageInfo>, EngineError> {
        let reference_filter = format!("reference={}*", naming::IMAGE_REFERENCE_PREFIX);
        let invocation = self.command().args([
            "images",
            "--filter",
            reference_filter.as_str(),
            "--format",
            IMAGE_FORMAT,
        ]);
        let output = self.output(Operation::ListImages, invocation).await?;
        Ok(parse::images(&output))
    }

    pub(crate) async fn remove_image(&self, image: &ImageInfo) -> Result<(), EngineError> {
        let invocation = self.command().args(["rmi", "-f", image.image_name.as_str()]);
        self.execute(Operation::RemoveImage, invocation).await
    }

    pub(crate) async fn run(
        &self,
        project: &ProjectEntry,
        args: &[String],
    ) -> Result<(), EngineError> {
        let invocation = self
            .compose(project)
            .args(["run", "--rm", naming::COMPOSE_SERVICE])
            .args(args)
            .stdio(StdioMode::Interactive);
        self.execute(Operation::Run, invocation).await
    }

    pub(crate) async fn join(
        &self,
        container: &ContainerInfo,
        args: &[String],
    ) -> Result<(), EngineError> {
        let invocation = self
            .command()
            .args(["exec", "-it", container.container_id.as_str(), naming::JOIN_ENTRYPOINT])
            .args(args)
            .stdio(StdioMode::Interactive);
        self.execute(Operation::Join, invocation).await
    }

    pub(crate) async fn list_containers(&self) -> Result<Vec<ContainerInfo>, EngineError> {
        let invocation = self
            .command()
            .args(["ps", "-a"])
            .args(compose_filter(CONTAINER_FORMAT));
        let output = self.output(Operation::ListContainers, invocation).await?;
        Ok(parse::containers(&output))
    }

    pub(crate) async fn remove_container(
        &self,
        container: &ContainerInfo,
    ) -> Result<(), EngineError> {
        let invocation = self.command().args(["rm", "-f", container.container_id.as_str()]);
        self.execute(Operation::RemoveContainer, invocation).await
    }

    pub(crate) async fn create_volume(&self, name: &str) -> Result<(), EngineError> {
        let invocation = self.command().args(["volume", "create", name]);
        self.execute(Operation::CreateVolume, invocation).await
    }

    pub(crate) async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, EngineError> {
        let invocation = self
            .command()
            .args(["volume", "ls"])
            .args(compose_filter(VOLUME_FORMAT));
        let output = self.output(Operation::ListVolumes, invocation).await?;
        Ok(parse::volumes(&output))
    }

    pub(crate) async fn remove_volume(&self, volume: &VolumeInfo) -> Result<(), EngineError> {
        let invocation = self.command().args(["volume", "rm", volume.volume_name.as_str()]);
        self.execute(Operation::RemoveVolume, invocation).await
    }

    pub(crate) async fn list_networks(&self) -> Result<Vec<NetworkInfo>, EngineError> {
        let invocation = self
            .command()
            .args(["network", "ls"])
            .args(compose_filter(NETWORK_FORMAT));
        let output = self.output(Operation::ListNetworks, invocation).await?;
        Ok(parse::networks(&output))
    }

    pub(crate) async fn remove_network(&self, network: &NetworkInfo) -> Result<(), EngineError> {
        let invocation = self.command().args(["network", "rm", network.network_id.as_str()]);
        self.execute(Operation::RemoveNetwork, invocation).await
    }

    /// `<tool> --version`, with the version number taken from the first
    /// capture group of `pattern`.
    pub(crate) async fn version(&self, pattern: &Regex) -> Result<EngineInfo, EngineError> {
        let invocation = self.command().arg("--version");
        let output = self.output(Operation::Version, invocation).await?;
        let version =
            parse::version(&output, pattern).ok_or_else(|| EngineError::UnparseableOutput {
                engine: self.kind,
                output: output.trim().to_string(),
            })?;
        Ok(EngineInfo {
            name: self.kind.to_string(),
            version,
        })
    }

    /// Run and require success; returns captured stdout.
    pub(crate) async fn output(
        &self,
        operation: Operation,
        invocation: Invocation,
    ) -> Result<String, EngineError> {
        match self.attempt(&invocation).await {
            Ok(output) => Ok(output.stdout),
            Err(err) => Err(self.fail(operation, err).await),
        }
    }

    /// Run and require success, discarding output.
    pub(crate) async fn execute(
        &self,
        operation: Operation,
        invocation: Invocation,
    ) -> Result<(), EngineError> {
        self.output(operation, invocation).await.map(|_| ())
    }

    /// Run an inspect-style command where the backend's not-found exit codes
    /// mean the target is absent.
    pub(crate) async fn inspect(
        &self,
        target: &str,
        invocation: Invocation,
    ) -> Result<String, EngineError> {
        let err = match self.attempt(&invocation).await {
            Ok(output) => return Ok(output.stdout),
            Err(err) => err,
        };
        if err.is_cancellation() {
            return Err(self.cancelled(Operation::InspectImage, err));
        }
        if let Some(reclassified) =
            classify(&self.runner, &self.probe, Operation::InspectImage).await
        {
            return Err(reclassified);
        }
        match err.exit_code() {
            Some(code) if self.settings.not_found_exit_codes.contains(&code) => {
                Err(EngineError::NotFound {
                    target: target.to_string(),
                    source: err,
                })
            }
            _ => Err(EngineError::OperationFailed {
                engine: self.kind,
                operation: Operation::InspectImage,
                source: err,
            }),
        }
    }

    async fn attempt(&self, invocation: &Invocation) -> Result<InvocationOutput, InvocationError> {
        self.runner.run(invocation).await?.into_result(invocation)
    }

    /// Error for a failed operation: cancellation as-is, then the probe's
    /// verdict (itself cancellable), then the operation's own failure.
    async fn fail(&self, operation: Operation, err: InvocationError) -> EngineError {
        if err.is_cancellation() {
            return self.cancelled(operation, err);
        }
        if let Some(reclassified) = classify(&self.runner, &self.probe, operation).await {
            return reclassified;
        }
        EngineError::OperationFailed {
            engine: self.kind,
            operation,
            source: err,
        }
    }

    fn cancelled(&self, operation: Operation, err: InvocationError) -> EngineError {
        tracing::debug!(engine = %self.kind, %operation, "operation interrupted");
        EngineError::Cancelled {
            engine: self.kind,
            operation,
            source: err,
        }
    }
}
