//! # Registry configuration.
//!
//! Provides [`Config`] centralized settings for a [`CleanupRegistry`](crate::CleanupRegistry).
//!
//! Config is used in two ways:
//! 1. **Registry creation**: `CleanupRegistry::new(config)` / `CleanupRegistry::builder(config)`
//! 2. **Runtime adjustment**: `CleanupRegistry::set_timeout` overrides `timeout`
//!    until the first walk
//!
//! ## Sentinel values
//! - `timeout = 0s` → no walk deadline (actions are awaited until they finish)
//! - `bus_capacity = 0` → clamped to 1

use std::time::Duration;

use crate::policies::DeadlineScope;

/// Default execution time budget for one cleanup walk.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for a cleanup registry.
///
/// ## Field semantics
/// - `timeout`: time budget of a walk (`0s` = unbounded)
/// - `deadline_scope`: whether the budget is shared by the whole walk or granted per action
/// - `abort_abandoned`: abort actions still running in the background once the walk ends
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus)
/// - `exit_code`: status used by the signal bridge when it terminates the process
#[derive(Clone, Debug)]
pub struct Config {
    /// Execution time budget.
    ///
    /// - `Duration::ZERO` = no deadline
    /// - `> 0` = deadline derived when a walk starts
    pub timeout: Duration,

    /// How the time budget is applied across actions.
    pub deadline_scope: DeadlineScope,

    /// Abort abandoned actions after the walk finishes (opt-in).
    ///
    /// Abandoned actions always receive a cancelled token and otherwise keep running in
    /// the background. When this flag is set, actions that were in flight when their
    /// deadline fired are also aborted at their next `.await` point. Actions spawned
    /// after the deadline had already passed are never aborted. Actions that block a
    /// thread without yielding cannot be interrupted either way.
    pub abort_abandoned: bool,

    /// Capacity of the event bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Process exit status used after a signal-triggered cleanup.
    pub exit_code: i32,
}

impl Config {
    /// Returns the walk time budget as an `Option`.
    ///
    /// - `None` → no deadline
    /// - `Some(d)` → deadline `d` after the walk starts
    #[inline]
    pub fn walk_timeout(&self) -> Option<Duration> {
        if self.timeout == Duration::ZERO {
            None
        } else {
            Some(self.timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `timeout = 30s`
    /// - `deadline_scope = DeadlineScope::Shared`
    /// - `abort_abandoned = false`
    /// - `bus_capacity = 1024`
    /// - `exit_code = 1`
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            deadline_scope: DeadlineScope::default(),
            abort_abandoned: false,
            bus_capacity: 1024,
            exit_code: 1,
        }
    }
}
