// ABOUTME: Library root for paulenv - exposes the engine layer and its support types.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod engine;
pub mod error;
pub mod output;
pub mod types;
