// ABOUTME: Composable capability traits for container engines.
// ABOUTME: Defines ImageOps, ContainerOps, VolumeOps, NetworkOps, EngineInfoOps and their union.

mod container;
mod engine_info;
mod image;
mod network;
pub(crate) mod sealed;
mod volume;

pub use container::ContainerOps;
pub use engine_info::EngineInfoOps;
pub use image::ImageOps;
pub use network::NetworkOps;
pub use volume::VolumeOps;

/// Every capability a backend provides, usable as `Box<dyn ContainerEngine>`.
pub trait ContainerEngine: ImageOps + ContainerOps + VolumeOps + NetworkOps + EngineInfoOps {}

impl<T> ContainerEngine for T where
    T: ImageOps + ContainerOps + VolumeOps + NetworkOps + EngineInfoOps
{
}
