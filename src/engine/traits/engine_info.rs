// ABOUTME: Engine metadata trait.
// ABOUTME: Reports which backend is in use and its version.

use super::sealed::Sealed;
use crate::engine::error::EngineError;
use crate::engine::types::{EngineInfo, EngineKind};
use async_trait::async_trait;

#[async_trait]
pub trait EngineInfoOps: Sealed + Send + Sync {
    fn kind(&self) -> EngineKind;

    /// Query the tool's version.
    async fn info(&self) -> Result<EngineInfo, EngineError>;
}
