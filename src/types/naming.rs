// ABOUTME: Naming conventions shared by every engine backend.
// ABOUTME: Builds paulenv resource names and derives project names back from them.

/// Prefix of compose project names, and therefore of containers, volumes
/// and networks created by compose.
pub const COMPOSE_PROJECT_PREFIX: &str = "paulenv-";

/// Prefix of image references built for a project (`paulenv:<project>`).
pub const IMAGE_REFERENCE_PREFIX: &str = "paulenv:";

/// Suffix compose gives to a project's default network.
pub const DEFAULT_NETWORK_SUFFIX: &str = "_default";

/// Label carried by build artifacts, used to scope cache pruning.
pub const MANAGEMENT_LABEL: &str = "paulenv=true";

/// Compose service started by `run`.
pub const COMPOSE_SERVICE: &str = "paulenv";

/// Entrypoint executed when joining a running container.
pub const JOIN_ENTRYPOINT: &str = "/usr/local/bin/entrypoint.sh";

/// Environment variable receiving the compose project name.
pub const COMPOSE_PROJECT_NAME_VAR: &str = "COMPOSE_PROJECT_NAME";

/// Environment variable receiving the dotfiles directory at build time.
pub const DOTFILES_DIR_VAR: &str = "DOTFILES_DIR";

pub fn compose_project_name(project: &str) -> String {
    format!("{COMPOSE_PROJECT_PREFIX}{project}")
}

pub fn image_reference(project: &str) -> String {
    format!("{IMAGE_REFERENCE_PREFIX}{project}")
}

/// Project of an image reference following `paulenv:<project>`.
pub fn project_from_image(reference: &str) -> Option<String> {
    non_empty(reference.strip_prefix(IMAGE_REFERENCE_PREFIX)?)
}

/// Project of a network following `paulenv-<project>_default`.
///
/// The `_default` suffix is optional; `paulenv-<project>` yields the
/// remainder as-is.
pub fn project_from_network(name: &str) -> Option<String> {
    let remainder = name.strip_prefix(COMPOSE_PROJECT_PREFIX)?;
    let project = remainder
        .strip_suffix(DEFAULT_NETWORK_SUFFIX)
        .unwrap_or(remainder);
    non_empty(project)
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
