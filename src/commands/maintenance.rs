// ABOUTME: Maintenance commands: volumes, project cleanup, and build cache pruning.
// ABOUTME: Cleanup removes enumerated resources belonging to a single project.

use paulenv::engine::{ContainerEngine, VolumeInfo};
use paulenv::error::Result;
use paulenv::output::Output;
use paulenv::types::VolumeId;

pub async fn create_volume(engine: &dyn ContainerEngine, name: &str, output: &Output) -> Result<()> {
    engine.create_volume(name).await?;
    output.success(&format!("Created volume {name}"));
    Ok(())
}

pub async fn remove_volume(engine: &dyn ContainerEngine, name: &str, output: &Output) -> Result<()> {
    let volume = VolumeInfo {
        volume_id: VolumeId::new(name),
        volume_name: name.to_string(),
    };
    engine.remove_volume(&volume).await?;
    output.success(&format!("Removed volume {name}"));
    Ok(())
}

/// Remove the project's containers, then its networks, then its images.
pub async fn clean(engine: &dyn ContainerEngine, project: &str, output: &mut Output) -> Result<()> {
    output.start_timer();
    let owned = |name: &Option<String>| name.as_deref() == Some(project);

    let mut removed = 0;
    for container in engine.list_containers().await? {
        if owned(&container.project_name) {
            output.progress(&format!("  → Removing container {}", container.container_id));
            engine.remove_container(&container).await?;
            removed += 1;
        }
    }
    for network in engine.list_networks().await? {
        if owned(&network.project_name) {
            output.progress(&format!("  → Removing network {}", network.network_name));
            engine.remove_network(&network).await?;
            removed += 1;
        }
    }
    for image in engine.list_images().await? {
        if owned(&image.project_name) {
            output.progress(&format!("  → Removing image {}", image.image_name));
            engine.remove_image(&image).await?;
            removed += 1;
        }
    }

    if removed == 0 {
        output.warning(&format!("nothing to clean for project {project}"));
    }
    output.success(&format!("Cleaned {project} ({removed} resource(s) removed)"));
    Ok(())
}

pub async fn prune(engine: &dyn ContainerEngine, output: &Output) -> Result<()> {
    engine.prune_build_cache().await?;
    output.success("Pruned paulenv build cache");
    Ok(())
}
