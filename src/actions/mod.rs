//! # Cleanup action abstractions.
//!
//! This module provides the action-related types:
//! - [`Action`] - trait for implementing named, fallible teardown steps
//! - [`ActionFn`] - closure-backed action implementation
//! - [`ActionRef`] - shared reference to an action (`Arc<dyn Action>`)
//! - [`ActionSpec`] - action bundled with its [`FailurePolicy`](crate::FailurePolicy)

mod action;
mod action_fn;
mod spec;

pub use action::{Action, ActionRef, BoxActionFuture};
pub use action_fn::ActionFn;
pub use spec::ActionSpec;
