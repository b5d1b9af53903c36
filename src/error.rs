//! Error types used by the cleanup registry, its actions and the guards around it.
//!
//! This module defines:
//!
//! - [`ActionError`]: errors raised by a single cleanup action.
//! - [`ActionFailure`]: an [`ActionError`] tagged with the name of the action that produced it.
//! - [`CleanupError`]: the aggregate outcome of one
//!   [`execute`](crate::CleanupRegistry::execute) walk.
//! - [`GuardError`]: outcome of a call protected by a [`FaultGuard`](crate::FaultGuard).
//! - [`SignalError`]: failure to bind a [`SignalBridge`](crate::SignalBridge).
//!
//! Errors provide `as_label`/`as_message` helpers for logs and metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by a single cleanup action.
///
/// Returned by [`Action::run`](crate::Action::run) (`Fail`) or synthesized by the
/// runner (`Timeout`, `Canceled`, `Panicked`).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// The action ran and reported a failure.
    #[error("{error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The action did not complete before the walk deadline and was abandoned.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The time budget that was exceeded.
        timeout: Duration,
    },

    /// The caller's cancellation token fired before the action completed or started.
    #[error("context cancelled")]
    Canceled,

    /// The action panicked; the panic was caught and folded into the outcome.
    #[error("panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl ActionError {
    /// Shorthand for [`ActionError::Fail`].
    ///
    /// # Example
    /// ```
    /// use lifeguard::ActionError;
    ///
    /// let err = ActionError::fail("disk busy");
    /// assert_eq!(err.to_string(), "disk busy");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        ActionError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use lifeguard::ActionError;
    /// use std::time::Duration;
    ///
    /// let err = ActionError::Timeout { timeout: Duration::from_secs(1) };
    /// assert_eq!(err.as_label(), "action_timeout");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ActionError::Fail { .. } => "action_failed",
            ActionError::Timeout { .. } => "action_timeout",
            ActionError::Canceled => "action_canceled",
            ActionError::Panicked { .. } => "action_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ActionError::Fail { error } => format!("error: {error}"),
            ActionError::Timeout { timeout } => format!("timeout: {timeout:?}"),
            ActionError::Canceled => "context cancelled".to_string(),
            ActionError::Panicked { message } => format!("panic: {message}"),
        }
    }

    /// Indicates whether the error was synthesized by the runner because the
    /// action did not finish in time (deadline or caller cancellation).
    pub fn is_abandoned(&self) -> bool {
        matches!(self, ActionError::Timeout { .. } | ActionError::Canceled)
    }
}

impl From<String> for ActionError {
    fn from(error: String) -> Self {
        ActionError::Fail { error }
    }
}

impl From<&str> for ActionError {
    fn from(error: &str) -> Self {
        ActionError::Fail {
            error: error.to_string(),
        }
    }
}

/// A failed action together with the name it was registered under.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{name}: {error}")]
pub struct ActionFailure {
    /// Registered action name.
    pub name: String,
    /// Cause of the failure.
    pub error: ActionError,
}

/// # Aggregate outcome of one cleanup walk.
///
/// Failures are listed in the order they were observed, which is reverse
/// registration order.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanupError {
    /// One or more actions failed and were not marked `ignore_error`.
    #[error("cleanup failed: {}", join_failures(.failures))]
    Aggregate {
        /// Ordered per-action failures.
        failures: Vec<ActionFailure>,
    },
}

impl CleanupError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CleanupError::Aggregate { .. } => "cleanup_aggregate",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CleanupError::Aggregate { failures } => {
                format!("{} action(s) failed: {}", failures.len(), join_failures(failures))
            }
        }
    }

    /// Returns the individual failures.
    pub fn failures(&self) -> &[ActionFailure] {
        match self {
            CleanupError::Aggregate { failures } => failures,
        }
    }

    /// Returns `true` if an action with the given name is part of the outcome.
    pub fn contains(&self, name: &str) -> bool {
        self.failures().iter().any(|f| f.name == name)
    }
}

fn join_failures(failures: &[ActionFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// # Outcome of a call protected by a [`FaultGuard`](crate::FaultGuard).
///
/// The protected operation's own failure takes precedence over the cleanup outcome.
#[derive(Error, Debug)]
pub enum GuardError<E> {
    /// The protected operation returned an error (cleanup still ran).
    #[error("operation failed: {0}")]
    Operation(E),

    /// The operation succeeded but cleanup did not.
    #[error(transparent)]
    Cleanup(#[from] CleanupError),
}

impl<E> GuardError<E> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            GuardError::Operation(_) => "guard_operation_failed",
            GuardError::Cleanup(_) => "guard_cleanup_failed",
        }
    }
}

/// # Errors produced while binding OS signals to a registry.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SignalError {
    /// The registry already has a signal bridge bound to it.
    #[error("signal handling already enabled for this registry")]
    AlreadyBound,

    /// Registering the OS signal listener failed.
    #[error("signal registration failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display_is_name_colon_cause() {
        let f = ActionFailure {
            name: "db".into(),
            error: ActionError::fail("connection reset"),
        };
        assert_eq!(f.to_string(), "db: connection reset");
    }

    #[test]
    fn test_aggregate_joins_in_order() {
        let err = CleanupError::Aggregate {
            failures: vec![
                ActionFailure {
                    name: "c".into(),
                    error: ActionError::fail("x"),
                },
                ActionFailure {
                    name: "a".into(),
                    error: ActionError::Timeout {
                        timeout: Duration::from_millis(50),
                    },
                },
            ],
        };
        assert_eq!(err.to_string(), "cleanup failed: c: x; a: timed out after 50ms");
        assert!(err.contains("a"));
        assert!(!err.contains("b"));
        assert_eq!(err.as_label(), "cleanup_aggregate");
    }

    #[test]
    fn test_abandoned_classification() {
        assert!(ActionError::Canceled.is_abandoned());
        assert!(
            ActionError::Timeout {
                timeout: Duration::from_secs(1)
            }
            .is_abandoned()
        );
        assert!(!ActionError::fail("boom").is_abandoned());
        assert!(
            !ActionError::Panicked {
                message: "boom".into()
            }
            .is_abandoned()
        );
    }
}
