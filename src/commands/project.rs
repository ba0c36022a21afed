// ABOUTME: Project lifecycle commands: build, run, and join.
// ABOUTME: Build streams compose output; run and join hand the terminal to the container.

use paulenv::engine::ContainerEngine;
use paulenv::error::{Error, Result};
use paulenv::output::Output;
use paulenv::types::ProjectEntry;
use std::path::Path;

pub async fn build(
    engine: &dyn ContainerEngine,
    project: &ProjectEntry,
    dotfiles_dir: &Path,
    output: &mut Output,
) -> Result<()> {
    output.progress(&format!("Building {}...", project.image_reference()));
    output.start_timer();
    engine.build_image(project, dotfiles_dir).await?;
    output.success(&format!("Built {}", project.image_reference()));
    Ok(())
}

pub async fn run(engine: &dyn ContainerEngine, project: &ProjectEntry, args: &[String]) -> Result<()> {
    if !engine.has_been_built(&project.project_name).await? {
        return Err(Error::NotBuilt(project.project_name.clone()));
    }
    engine.run_container(project, args).await?;
    Ok(())
}

/// Join a running container, addressed by a full or abbreviated id.
pub async fn join(engine: &dyn ContainerEngine, container_id: &str, args: &[String]) -> Result<()> {
    let containers = engine.list_containers().await?;
    let container = containers
        .iter()
        .find(|c| c.container_id.as_str() == container_id)
        .or_else(|| {
            containers
                .iter()
                .find(|c| c.container_id.as_str().starts_with(container_id))
        })
        .ok_or_else(|| Error::ContainerNotFound(container_id.to_string()))?;

    tracing::debug!(container = %container.container_id, "joining container");
    engine.join_container(container, args).await?;
    Ok(())
}
