// ABOUTME: Command module aggregator for the paulenv CLI.
// ABOUTME: Re-exports query, project, and maintenance command handlers.

mod engine_connection;
mod maintenance;
mod project;
mod query;

pub use engine_connection::connect;
pub use maintenance::{clean, create_volume, prune, remove_volume};
pub use project::{build, join, run};
pub use query::{info, list, status};
