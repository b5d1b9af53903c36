//! # LogWriter: event to `tracing` bridge
//!
//! A minimal subscriber that forwards every [`Event`] to `tracing` under the
//! `lifeguard` target. Install any `tracing` subscriber to see the output.
//!
//! ## Example output
//! ```text
//! INFO  lifeguard: execution started actions=3 timeout_ms=30000
//! DEBUG lifeguard: action starting action="close-db"
//! WARN  lifeguard: action failed action="close-db" reason="connection reset" ignored=false
//! WARN  lifeguard: action timed out action="flush" timeout_ms=30000
//! INFO  lifeguard: execution finished failures=1
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let action = e.action.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");
        match e.kind {
            EventKind::ExecutionStarted => {
                tracing::info!(
                    target: "lifeguard",
                    actions = ?e.count,
                    timeout_ms = ?e.timeout_ms,
                    "execution started"
                );
            }
            EventKind::ExecutionSkipped => {
                tracing::debug!(target: "lifeguard", "execution skipped: already executed");
            }
            EventKind::ExecutionFinished => {
                tracing::info!(target: "lifeguard", failures = ?e.count, "execution finished");
            }
            EventKind::CriticalHalt => {
                tracing::error!(
                    target: "lifeguard",
                    action,
                    skipped = ?e.count,
                    "critical action failed, halting"
                );
            }
            EventKind::RegistryReset => {
                tracing::debug!(target: "lifeguard", "registry reset");
            }
            EventKind::ActionStarting => {
                tracing::debug!(target: "lifeguard", action, "action starting");
            }
            EventKind::ActionCompleted => {
                tracing::debug!(target: "lifeguard", action, "action completed");
            }
            EventKind::ActionFailed => {
                tracing::warn!(
                    target: "lifeguard",
                    action,
                    reason,
                    ignored = e.ignored,
                    "action failed"
                );
            }
            EventKind::ActionTimedOut => {
                tracing::warn!(
                    target: "lifeguard",
                    action,
                    timeout_ms = ?e.timeout_ms,
                    "action timed out"
                );
            }
            EventKind::FaultIntercepted => {
                tracing::error!(target: "lifeguard", reason, "fault intercepted, running cleanup");
            }
            EventKind::SignalReceived => {
                tracing::warn!(
                    target: "lifeguard",
                    signal = reason,
                    "signal received, running cleanup"
                );
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(
                    target: "lifeguard",
                    subscriber = action,
                    reason,
                    lost = ?e.count,
                    "subscriber overflow"
                );
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(
                    target: "lifeguard",
                    subscriber = action,
                    reason,
                    "subscriber panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
