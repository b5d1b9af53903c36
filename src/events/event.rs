//! # Events emitted by a cleanup registry and its triggers.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Walk events**: one `execute` call (started, skipped, halted, finished)
//! - **Action events**: one action inside a walk (starting, completed, failed, timed out)
//! - **Trigger events**: what fired the walk (fault, OS signal) and registry reset
//! - **Subscriber events**: overflow and panic of subscriber workers
//!
//! The [`Event`] struct carries metadata such as timestamps, action names,
//! reasons and counts.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use lifeguard::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::ActionFailed)
//!     .with_action("drop-db")
//!     .with_reason("connection refused")
//!     .with_timeout(Duration::from_secs(5));
//!
//! assert_eq!(ev.kind, EventKind::ActionFailed);
//! assert_eq!(ev.action.as_deref(), Some("drop-db"));
//! assert_eq!(ev.timeout_ms, Some(5000));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of registry events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets: `action` (subscriber name), `reason` (panic message).
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets: `action` (subscriber name), `reason`.
    SubscriberOverflow,

    // === Walk events ===
    /// A walk took its snapshot and is about to run it.
    ///
    /// Sets: `count` (snapshot size), `timeout_ms` (budget, if bounded).
    ExecutionStarted,

    /// `execute` was called on a registry that already executed; nothing ran.
    ExecutionSkipped,

    /// A critical action failed; actions registered before it were not run.
    ///
    /// Sets: `action`, `count` (number of actions skipped).
    CriticalHalt,

    /// The walk finished.
    ///
    /// Sets: `count` (number of recorded failures).
    ExecutionFinished,

    /// The registry was reset and can be executed again.
    RegistryReset,

    // === Action events ===
    /// Action is starting.
    ///
    /// Sets: `action`.
    ActionStarting,

    /// Action finished successfully.
    ///
    /// Sets: `action`.
    ActionCompleted,

    /// Action failed (error, panic or cancellation).
    ///
    /// Sets: `action`, `reason`, `ignored` when the failure is left out of the outcome.
    ActionFailed,

    /// Action did not complete before its deadline and was abandoned.
    ///
    /// Sets: `action`, `timeout_ms`.
    ActionTimedOut,

    // === Trigger events ===
    /// A fault guard intercepted a panic of the protected operation.
    ///
    /// Sets: `reason` (panic message).
    FaultIntercepted,

    /// A signal bridge observed an OS termination signal.
    ///
    /// Sets: `reason` (signal name).
    SignalReceived,
}

/// Registry event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Name of the action (or subscriber), if applicable.
    pub action: Option<Arc<str>>,
    /// Human-readable reason (errors, signal names, overflow details).
    pub reason: Option<Arc<str>>,
    /// Time budget in milliseconds (compact).
    pub timeout_ms: Option<u32>,
    /// Kind-specific counter (snapshot size, failures, skipped actions).
    pub count: Option<u32>,
    /// Set on `ActionFailed` when the failure is suppressed by `ignore_error`.
    pub ignored: bool,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            action: None,
            reason: None,
            timeout_ms: None,
            count: None,
            ignored: false,
        }
    }

    /// Attaches an action name.
    #[inline]
    pub fn with_action(mut self, action: impl Into<Arc<str>>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a time budget (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Attaches a counter.
    #[inline]
    pub fn with_count(mut self, n: usize) -> Self {
        self.count = Some(n.min(u32::MAX as usize) as u32);
        self
    }

    /// Marks a failure as suppressed from the outcome.
    #[inline]
    pub fn with_ignored(mut self, ignored: bool) -> Self {
        self.ignored = ignored;
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_action(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_action(subscriber)
            .with_reason(info)
    }
}
