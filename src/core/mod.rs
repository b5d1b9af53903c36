//! Registry core: state, execution and construction.
//!
//! The public API from this module is [`CleanupRegistry`], its [`RegistryBuilder`]
//! and the observable [`ExecState`].
//!
//! Internal modules:
//! - [`registry`]: action list, run-once walk, reset;
//! - [`runner`]: runs one action on its own task, raced against the deadline;
//! - [`state`]: atomic `Pending → Executing → Done` transitions;
//! - [`builder`]: subscriber wiring.

mod builder;
mod registry;
mod runner;
mod state;

pub use builder::RegistryBuilder;
pub use registry::{CleanupRegistry, RegistryRef};
pub use state::ExecState;
