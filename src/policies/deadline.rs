//! # Deadline scope of a cleanup walk.
//!
//! [`DeadlineScope`] determines how the registry's time budget is spread over the actions:
//!
//! ```text
//! Shared (default):
//!   walk start ──────────────── deadline = start + timeout
//!   [ action C ][ action B ][ action A ]   every action races the same instant;
//!                                          once it passes, the rest time out immediately
//!
//! PerAction:
//!   [ action C ≤ timeout ][ action B ≤ timeout ][ action A ≤ timeout ]
//! ```
//!
//! A deadline supplied by the caller (`execute_until`) is never extended by either scope.

use std::time::Duration;

use tokio::time::Instant;

/// How the walk time budget is applied.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeadlineScope {
    /// One deadline for the whole walk (bounded worst-case latency).
    #[default]
    Shared,
    /// Every action gets a fresh budget when it starts.
    PerAction,
}

impl DeadlineScope {
    /// Computes the deadline for the next action.
    ///
    /// - `walk`: deadline fixed when the walk started (`None` = unbounded)
    /// - `timeout`: configured budget (`None` = unbounded)
    /// - `outer`: deadline imposed by the caller, if any
    pub fn action_deadline(
        &self,
        walk: Option<Instant>,
        timeout: Option<Duration>,
        outer: Option<Instant>,
    ) -> Option<Instant> {
        let own = match self {
            DeadlineScope::Shared => walk,
            DeadlineScope::PerAction => timeout.map(|d| Instant::now() + d),
        };
        earliest(own, outer)
    }
}

/// Returns the earlier of two optional deadlines.
pub(crate) fn earliest(a: Option<Instant>, b: Option<Instant>) -> Option<Instant> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}
