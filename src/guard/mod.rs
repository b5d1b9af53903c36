//! # Triggers bound to a scope.
//!
//! - [`FaultGuard`] runs a protected operation and cleans up after it, including
//!   (opt-in) when it panics.
//! - [`ScopedCleanup`] binds a registry to one cancellation token for
//!   "clean up when this scope ends" code.
//! - [`Outcome`] is the tagged result captured at the protected call boundary.

mod fault;
mod scoped;

pub use fault::{FaultGuard, Outcome};
pub use scoped::ScopedCleanup;
