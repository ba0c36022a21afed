// ABOUTME: Type-safe identifiers, project entries, and naming conventions.
// ABOUTME: Uses phantom types to prevent ID confusion at compile time.

mod id;
pub mod naming;
mod project;

pub use id::{ContainerId, NetworkId, VolumeId};
pub use project::ProjectEntry;
