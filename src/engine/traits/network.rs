// ABOUTME: Network operations trait for container engines.
// ABOUTME: Enumerate and remove compose-created project networks.

use super::sealed::Sealed;
use crate::engine::error::EngineError;
use crate::engine::types::NetworkInfo;
use async_trait::async_trait;

#[async_trait]
pub trait NetworkOps: Sealed + Send + Sync {
    async fn list_networks(&self) -> Result<Vec<NetworkInfo>, EngineError>;

    /// Remove a network by id. Fails while containers are still attached.
    async fn remove_network(&self, network: &NetworkInfo) -> Result<(), EngineError>;
}
