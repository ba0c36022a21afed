// ABOUTME: Application-wide error types for paulenv.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::engine::EngineError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("project {0} has not been built yet, run `paulenv build` first")]
    NotBuilt(String),

    #[error("no paulenv container with id {0}")]
    ContainerNotFound(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
