// ABOUTME: Read-only commands: engine info, resource listings, project status.
// ABOUTME: Renders engine records through the configured output mode.

use crate::cli::Resource;
use paulenv::engine::ContainerEngine;
use paulenv::error::Result;
use paulenv::output::Output;

pub async fn info(engine: &dyn ContainerEngine, output: &Output) -> Result<()> {
    let info = engine.info().await?;
    output.record(&format!("{} {}", info.name, info.version), &info);
    Ok(())
}

pub async fn list(engine: &dyn ContainerEngine, resource: Resource, output: &Output) -> Result<()> {
    match resource {
        Resource::Images => {
            for image in engine.list_images().await? {
                let built = image
                    .built_at
                    .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
                    .unwrap_or_else(|| "-".to_string());
                output.record(&format!("{}\t{}", image.image_name, built), &image);
            }
        }
        Resource::Containers => {
            for container in engine.list_containers().await? {
                let line = format!(
                    "{}\t{}\t{}",
                    container.container_id,
                    container.container_name.as_deref().unwrap_or("-"),
                    container.image_name.as_deref().unwrap_or("-"),
                );
                output.record(&line, &container);
            }
        }
        Resource::Volumes => {
            for volume in engine.list_volumes().await? {
                output.record(&volume.volume_name, &volume);
            }
        }
        Resource::Networks => {
            for network in engine.list_networks().await? {
                output.record(
                    &format!("{}\t{}", network.network_id, network.network_name),
                    &network,
                );
            }
        }
    }
    Ok(())
}

/// Report whether the project's image exists and when it was built.
pub async fn status(engine: &dyn ContainerEngine, project: &str, output: &Output) -> Result<()> {
    if !engine.has_been_built(project).await? {
        output.success(&format!("{project}: not built"));
        return Ok(());
    }

    let image = engine.get_image_info(project).await?;
    let line = match image.built_at {
        Some(built_at) => format!("{project}: built {}", built_at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => format!("{project}: built (time unknown)"),
    };
    output.record(&line, &image);
    Ok(())
}
