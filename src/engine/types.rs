// ABOUTME: Engine kinds and the records produced by engine queries.
// ABOUTME: Images, containers, volumes, networks, and engine version info.

use crate::types::{ContainerId, NetworkId, VolumeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The container engine backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    Podman,
    Docker,
}

impl EngineKind {
    /// Default command-line tool for this engine.
    pub fn default_program(&self) -> &'static str {
        match self {
            EngineKind::Podman => "podman",
            EngineKind::Docker => "docker",
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Podman => write!(f, "podman"),
            EngineKind::Docker => write!(f, "docker"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown container engine '{0}' (expected podman or docker)")]
pub struct UnknownEngineKind(String);

impl FromStr for EngineKind {
    type Err = UnknownEngineKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "podman" => Ok(EngineKind::Podman),
            "docker" => Ok(EngineKind::Docker),
            _ => Err(UnknownEngineKind(s.to_string())),
        }
    }
}

/// Identity and version of the active engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineInfo {
    pub name: String,
    pub version: String,
}

/// A project image known to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    /// Full reference, e.g. `paulenv:web`.
    pub image_name: String,
    pub project_name: Option<String>,
    pub built_at: Option<DateTime<Utc>>,
}

/// A running or stopped container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub container_id: ContainerId,
    pub container_name: Option<String>,
    pub image_name: Option<String>,
    pub project_name: Option<String>,
}

/// A named volume. CLI backends identify volumes by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeInfo {
    pub volume_id: VolumeId,
    pub volume_name: String,
}

/// A project network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkInfo {
    pub network_id: NetworkId,
    pub network_name: String,
    pub project_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_kind_round_trips_through_display() {
        for kind in [EngineKind::Podman, EngineKind::Docker] {
            assert_eq!(kind.to_string().parse::<EngineKind>().unwrap(), kind);
        }
    }

    #[test]
    fn engine_kind_parse_is_case_insensitive() {
        assert_eq!("Docker".parse::<EngineKind>().unwrap(), EngineKind::Docker);
        assert_eq!(" podman ".parse::<EngineKind>().unwrap(), EngineKind::Podman);
    }

    #[test]
    fn engine_kind_rejects_unknown() {
        let err = "containerd".parse::<EngineKind>().unwrap_err();
        assert!(err.to_string().contains("containerd"));
    }

    #[test]
    fn absent_fields_serialize_as_null() {
        let info = ImageInfo {
            image_name: "paulenv:web".to_string(),
            project_name: Some("web".to_string()),
            built_at: None,
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["project_name"], "web");
        assert!(json["built_at"].is_null());
    }
}
