// ABOUTME: Project entry handed to the engine by the project-layout resolver.
// ABOUTME: Carries the project name and its compose and env file paths.

use super::naming;
use std::path::{Path, PathBuf};

/// A configured development-environment project.
///
/// Entries are resolved elsewhere (dotfiles layout, compose templates); the
/// engine only reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEntry {
    pub project_name: String,
    pub compose_file_path: PathBuf,
    pub env_file_path: PathBuf,
}

impl ProjectEntry {
    pub fn new(
        project_name: impl Into<String>,
        compose_file_path: impl Into<PathBuf>,
        env_file_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            compose_file_path: compose_file_path.into(),
            env_file_path: env_file_path.into(),
        }
    }

    pub fn compose_file(&self) -> &Path {
        &self.compose_file_path
    }

    pub fn env_file(&self) -> &Path {
        &self.env_file_path
    }

    /// Value of `COMPOSE_PROJECT_NAME` for this project.
    pub fn compose_project_name(&self) -> String {
        naming::compose_project_name(&self.project_name)
    }

    /// Reference of the image built for this project.
    pub fn image_reference(&self) -> String {
        naming::image_reference(&self.project_name)
    }
}
