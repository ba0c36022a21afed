// ABOUTME: Image operations trait for container engines.
// ABOUTME: Build, inspect, enumerate and remove project images, prune the build cache.

use super::sealed::Sealed;
use crate::engine::error::EngineError;
use crate::engine::types::ImageInfo;
use crate::types::ProjectEntry;
use async_trait::async_trait;
use std::path::Path;

#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// Build the project's image through compose, streaming build output
    /// to the terminal.
    ///
    /// `dotfiles_dir` is passed to the build as `DOTFILES_DIR`, relative to
    /// the compose file's directory.
    async fn build_image(
        &self,
        project: &ProjectEntry,
        dotfiles_dir: &Path,
    ) -> Result<(), EngineError>;

    /// Whether `paulenv:<project_name>` exists locally.
    async fn has_been_built(&self, project_name: &str) -> Result<bool, EngineError>;

    /// Inspect the project's image. A missing image yields a record without
    /// a build time rather than an error.
    async fn get_image_info(&self, project_name: &str) -> Result<ImageInfo, EngineError>;

    async fn list_images(&self) -> Result<Vec<ImageInfo>, EngineError>;

    /// Force-remove an image by name.
    async fn remove_image(&self, image: &ImageInfo) -> Result<(), EngineError>;

    /// Remove build cache entries labelled as paulenv artifacts.
    async fn prune_build_cache(&self) -> Result<(), EngineError>;
}
