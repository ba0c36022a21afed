// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Merges partial backend sections onto each backend's defaults.

use serde::Deserialize;

use super::BackendSettings;

/// A backend section as written; omitted keys keep the backend default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct BackendSection {
    #[serde(default)]
    program: Option<String>,
    #[serde(default)]
    not_found_exit_codes: Option<Vec<i32>>,
}

impl BackendSection {
    fn merge_onto(self, mut defaults: BackendSettings) -> Result<BackendSettings, String> {
        if let Some(program) = self.program {
            if program.trim().is_empty() {
                return Err("program cannot be empty".to_string());
            }
            defaults.program = program;
        }
        if let Some(codes) = self.not_found_exit_codes {
            if codes.contains(&0) {
                return Err("not_found_exit_codes cannot contain 0".to_string());
            }
            defaults.not_found_exit_codes = codes;
        }
        Ok(defaults)
    }
}

pub fn deserialize_podman<'de, D>(deserializer: D) -> Result<BackendSettings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_backend(deserializer, BackendSettings::podman())
}

pub fn deserialize_docker<'de, D>(deserializer: D) -> Result<BackendSettings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserialize_backend(deserializer, BackendSettings::docker())
}

fn deserialize_backend<'de, D>(
    deserializer: D,
    defaults: BackendSettings,
) -> Result<BackendSettings, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let section: Option<BackendSection> = Option::deserialize(deserializer)?;
    section
        .unwrap_or_default()
        .merge_onto(defaults)
        .map_err(serde::de::Error::custom)
}
