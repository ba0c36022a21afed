// ABOUTME: Sealed trait pattern for engine capability traits.
// ABOUTME: Only backends defined in this crate may implement them.

/// Prevents implementations of the engine traits outside this crate.
pub trait Sealed {}
