// ABOUTME: Parsers turning engine CLI output into typed records.
// ABOUTME: Line-oriented, tab-delimited decoding with project-name derivation.

use super::types::{ContainerInfo, ImageInfo, NetworkInfo, VolumeInfo};
use crate::types::naming;
use crate::types::{ContainerId, NetworkId, VolumeId};
use chrono::{DateTime, Utc};
use regex::Regex;

/// Extract the captured version from `--version` output.
pub fn version(output: &str, pattern: &Regex) -> Option<String> {
    pattern
        .captures(output.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode `{{.Repository}}:{{.Tag}}\t{{.CreatedAt}}` lines.
pub fn images(output: &str) -> Vec<ImageInfo> {
    records(output)
        .map(|line| {
            let fields = fields(line, 2);
            let image_name = fields[0].to_string();
            ImageInfo {
                project_name: naming::project_from_image(&image_name),
                built_at: field(&fields, 1).and_then(|created| created_at(&created)),
                image_name,
            }
        })
        .collect()
}

/// Decode `{{.ID}}\t{{.Image}}\t{{.Names}}` lines.
pub fn containers(output: &str) -> Vec<ContainerInfo> {
    records(output)
        .map(|line| {
            let fields = fields(line, 3);
            let image_name = field(&fields, 1);
            ContainerInfo {
                container_id: ContainerId::new(fields[0]),
                container_name: field(&fields, 2),
                project_name: image_name.as_deref().and_then(naming::project_from_image),
                image_name,
            }
        })
        .collect()
}

/// Decode `{{.Name}}` lines.
pub fn volumes(output: &str) -> Vec<VolumeInfo> {
    records(output)
        .map(str::trim)
        .map(|name| VolumeInfo {
            volume_id: VolumeId::new(name),
            volume_name: name.to_string(),
        })
        .collect()
}

/// Decode `{{.ID}}\t{{.Name}}` lines. Lines without a name are dropped.
pub fn networks(output: &str) -> Vec<NetworkInfo> {
    records(output)
        .filter_map(|line| {
            let fields = fields(line, 2);
            let Some(network_name) = field(&fields, 1) else {
                tracing::debug!("dropping network line without a name: {:?}", line);
                return None;
            };
            Some(NetworkInfo {
                network_id: NetworkId::new(fields[0]),
                project_name: naming::project_from_network(&network_name),
                network_name,
            })
        })
        .collect()
}

/// Parse an image creation time from a listing.
///
/// The listing format differs between engine versions, so several layouts
/// are tried in order. Anything unrecognised is treated as unknown.
pub fn created_at(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    let parsed = zoned_timestamp(value).or_else(|| rfc3339(value));
    if parsed.is_none() {
        tracing::debug!("unrecognised image timestamp: {:?}", value);
    }
    parsed
}

/// Parse an RFC 3339 timestamp, with or without fractional seconds.
pub fn rfc3339(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value.trim())
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// `2024-01-15 10:30:00[.123456789] +0000 UTC`; the zone abbreviation is
/// informational and ignored.
fn zoned_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if !(3..=4).contains(&tokens.len()) {
        return None;
    }
    let without_zone_name = tokens[..3].join(" ");
    DateTime::parse_from_str(&without_zone_name, "%Y-%m-%d %H:%M:%S%.f %z")
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

fn records(output: &str) -> impl Iterator<Item = &str> {
    output
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
}

fn fields(line: &str, count: usize) -> Vec<&str> {
    line.splitn(count, '\t').map(str::trim).collect()
}

fn field(fields: &[&str], index: usize) -> Option<String> {
    fields
        .get(index)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}
