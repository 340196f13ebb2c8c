// ABOUTME: Sealed trait pattern for backend capability traits.
// ABOUTME: Only the local executor backend and the helper client implement them.

/// Prevents implementations of the capability traits outside this crate.
pub trait Sealed {}
