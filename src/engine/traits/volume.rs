// ABOUTME: Volume operations trait for container engines.
// ABOUTME: Create, enumerate and remove named volumes.

use super::sealed::Sealed;
use crate::engine::error::EngineError;
use crate::engine::types::VolumeInfo;
use async_trait::async_trait;

#[async_trait]
pub trait VolumeOps: Sealed + Send + Sync {
    async fn create_volume(&self, name: &str) -> Result<(), EngineError>;

    async fn list_volumes(&self) -> Result<Vec<VolumeInfo>, EngineError>;

    async fn remove_volume(&self, volume: &VolumeInfo) -> Result<(), EngineError>;
}
