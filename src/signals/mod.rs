//! # OS signal handling.
//!
//! - [`Signal`] names the termination signals a bridge can listen to.
//! - [`SignalBridge`] is an owned subscription that walks a registry when the first
//!   matching signal arrives, then terminates the process.

mod bridge;
mod kind;

pub use bridge::{ExitHook, SignalBridge};
pub use kind::Signal;
