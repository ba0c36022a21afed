// ABOUTME: Configuration types and parsing for paulenv.yml.
// ABOUTME: Engine choice, query deadline, and per-backend program and exit-code settings.

mod deserialize;

use crate::engine::EngineKind;
use crate::error::{Error, Result};
use deserialize::{deserialize_docker, deserialize_podman};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "paulenv.yml";
pub const CONFIG_FILENAME_ALT: &str = "paulenv.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".paulenv/config.yml";

/// Environment variable overriding the configured engine.
pub const ENGINE_ENV_VAR: &str = "PAULENV_ENGINE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Explicit backend; detected when unset.
    #[serde(default)]
    pub engine: Option<EngineKind>,

    /// Deadline for captured (query and management) invocations.
    #[serde(default, with = "humantime_serde")]
    pub timeout: Option<Duration>,

    #[serde(
        default = "BackendSettings::podman",
        deserialize_with = "deserialize_podman"
    )]
    pub podman: BackendSettings,

    #[serde(
        default = "BackendSettings::docker",
        deserialize_with = "deserialize_docker"
    )]
    pub docker: BackendSettings,
}

/// How to invoke one backend's command-line tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    pub program: String,
    /// Exit codes of `image inspect` that mean "no such image".
    pub not_found_exit_codes: Vec<i32>,
}

impl BackendSettings {
    pub fn podman() -> Self {
        Self {
            program: EngineKind::Podman.default_program().to_string(),
            not_found_exit_codes: vec![125, 1],
        }
    }

    pub fn docker() -> Self {
        Self {
            program: EngineKind::Docker.default_program().to_string(),
            not_found_exit_codes: vec![1],
        }
    }

    pub fn for_kind(kind: EngineKind) -> Self {
        match kind {
            EngineKind::Podman => Self::podman(),
            EngineKind::Docker => Self::docker(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            engine: None,
            timeout: None,
            podman: BackendSettings::podman(),
            docker: BackendSettings::docker(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults".
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Load the first config file found in `dir`, or defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        tracing::debug!("no configuration file in {}, using defaults", dir.display());
        Ok(Self::default())
    }

    /// Apply `PAULENV_ENGINE` on top of the file settings.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Ok(value) = std::env::var(ENGINE_ENV_VAR)
            && !value.trim().is_empty()
        {
            let kind = value.parse::<EngineKind>().map_err(|e| {
                Error::InvalidConfig(format!("{ENGINE_ENV_VAR}: {e}"))
            })?;
            self.engine = Some(kind);
        }
        Ok(self)
    }

    pub fn with_engine(mut self, engine: Option<EngineKind>) -> Self {
        if engine.is_some() {
            self.engine = engine;
        }
        self
    }

    pub fn backend(&self, kind: EngineKind) -> &BackendSettings {
        match kind {
            EngineKind::Podman => &self.podman,
            EngineKind::Docker => &self.docker,
        }
    }
}
