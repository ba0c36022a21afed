// ABOUTME: Podman backend driven through the podman command-line tool.
// ABOUTME: Implements all engine traits for Podman and podman compose.

mod engine;

pub use engine::{ACCESS_MARKERS, PodmanEngine};
