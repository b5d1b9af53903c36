//! # Test-framework integration.
//!
//! - [`TestHost`] is the minimal capability set a test harness must expose.
//! - [`ScopeHost`] is a built-in host for `#[tokio::test]` functions: it collects
//!   end-of-scope hooks and reported failures, and runs the hooks on [`ScopeHost::finish`].
//! - [`TestLifecycleAdapter`] binds a registry to a host's end-of-scope hook.

mod adapter;
mod host;

pub use adapter::TestLifecycleAdapter;
pub use host::{EndOfScopeHook, ScopeHost, TestHost};
