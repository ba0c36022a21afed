// ABOUTME: Docker backend driven through the docker command-line tool.
// ABOUTME: Implements all engine traits for Docker and the compose plugin.

mod engine;

pub use engine::{ACCESS_MARKERS, DockerEngine};
