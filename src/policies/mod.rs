//! Failure and deadline policies of a cleanup walk.
//!
//! ## Contents
//! - [`FailurePolicy`] whether a failing action is recorded and whether it halts the walk
//! - [`DeadlineScope`] how the walk time budget is spread over the actions
//!
//! ## Quick wiring
//! ```text
//! ActionSpec { action, policy: FailurePolicy }
//!      └─► CleanupRegistry::execute uses:
//!           - policy.records_failure() to build the aggregate error
//!           - policy.halts_walk() to stop before older actions
//!           - Config::deadline_scope to derive each action's deadline
//! ```
//!
//! ## Defaults
//! - `FailurePolicy::default()` → not critical, failures recorded.
//! - `DeadlineScope::Shared` → one deadline for the whole walk.

pub(crate) mod deadline;
mod failure;

pub use deadline::DeadlineScope;
pub use failure::FailurePolicy;
