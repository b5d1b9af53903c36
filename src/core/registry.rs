//! # Cleanup registry - ordered, run-once teardown.
//!
//! [`CleanupRegistry`] collects named actions during setup and walks them in reverse
//! registration order exactly once.
//!
//! ## Architecture
//! ```text
//! register(name, f) ──► Mutex<Inner>.actions.push(ActionSpec)
//!
//! execute(token)
//!   ├─► state.try_begin()          Pending → Executing (CAS), else no-op Ok(())
//!   ├─► snapshot = actions.clone() (lock released before the walk)
//!   ├─► walk deadline = min(now + timeout, caller deadline)
//!   ├─► for spec in snapshot.rev():
//!   │     ├─► run_action(spec, deadline)    (own tokio task, raced vs deadline)
//!   │     └─► Err(e):
//!   │           ├─ !ignore_error → failures.push("{name}: {e}")
//!   │           └─ critical      → CriticalHalt, stop
//!   ├─► abort in-flight abandoned tasks (opt-in: Config::abort_abandoned)
//!   └─► state.finish()             Executing → Done
//! ```
//!
//! ## Rules
//! - Actions registered after the snapshot was taken never run in that walk.
//! - The lock guards only the action list and the timeout; it is never held across `.await`.
//! - A failed walk is not retried by calling `execute` again; use [`CleanupRegistry::reset`].
//! - Dropping the `execute` future mid-walk leaves the registry in `Executing`.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{
    actions::{ActionFn, ActionRef, ActionSpec},
    config::Config,
    core::{
        builder::RegistryBuilder,
        runner::run_action,
        state::{ExecState, StateCell},
    },
    error::{ActionError, ActionFailure, CleanupError},
    events::{Bus, Event, EventKind},
    policies::{DeadlineScope, FailurePolicy, deadline::earliest},
};

/// State guarded by the registry lock.
struct Inner {
    actions: Vec<ActionSpec>,
    timeout: Duration,
}

/// Ordered registry of cleanup actions executed at most once, in LIFO order.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
/// use lifeguard::{CleanupRegistry, Config};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let registry = CleanupRegistry::new(Config::default());
///     registry.set_timeout(Duration::from_secs(5));
///
///     registry.register("close-db", |_ctx: CancellationToken| async { Ok(()) });
///     registry.register_critical("unmount", |_ctx: CancellationToken| async { Ok(()) });
///
///     // Runs "unmount" then "close-db".
///     registry.execute(&CancellationToken::new()).await.unwrap();
///
///     // Second call is a no-op.
///     assert!(registry.execute(&CancellationToken::new()).await.is_ok());
/// }
/// ```
pub struct CleanupRegistry {
    cfg: Config,
    bus: Bus,
    inner: Mutex<Inner>,
    state: StateCell,
    signal_bound: AtomicBool,
    /// Stops the subscriber listener when the registry is dropped.
    _listener: Option<DropGuard>,
}

impl CleanupRegistry {
    /// Creates an empty registry without subscribers.
    ///
    /// Does not require a running tokio runtime (only `execute` does).
    pub fn new(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::with_bus(cfg, bus, None)
    }

    /// Returns a builder for a registry with event subscribers.
    pub fn builder(cfg: Config) -> RegistryBuilder {
        RegistryBuilder::new(cfg)
    }

    pub(crate) fn with_bus(cfg: Config, bus: Bus, listener: Option<DropGuard>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                actions: Vec::new(),
                timeout: cfg.timeout,
            }),
            cfg,
            bus,
            state: StateCell::new(),
            signal_bound: AtomicBool::new(false),
            _listener: listener,
        }
    }

    // ---------------------------
    // Registration
    // ---------------------------

    /// Registers a closure-backed action with the default policy
    /// (failure recorded, walk continues).
    pub fn register<F, Fut>(&self, name: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.register_with(name, f, FailurePolicy::default());
    }

    /// Registers a closure-backed action whose failure halts the walk.
    pub fn register_critical<F, Fut>(&self, name: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.register_with(name, f, FailurePolicy::critical());
    }

    /// Registers a closure-backed action with an explicit failure policy.
    pub fn register_with<F, Fut>(
        &self,
        name: impl Into<Cow<'static, str>>,
        f: F,
        policy: FailurePolicy,
    ) where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.register_action(ActionFn::arc(name, f), policy);
    }

    /// Registers an existing action handle.
    pub fn register_action(&self, action: ActionRef, policy: FailurePolicy) {
        self.register_spec(ActionSpec::new(action, policy));
    }

    /// Appends a prepared specification.
    ///
    /// Safe to call concurrently. Has no effect on a walk whose snapshot was already taken.
    pub fn register_spec(&self, spec: ActionSpec) {
        self.inner.lock().actions.push(spec);
    }

    // ---------------------------
    // Configuration
    // ---------------------------

    /// Sets the execution time budget (`Duration::ZERO` = unbounded).
    ///
    /// Returns `false` and leaves the budget unchanged once the registry has started executing.
    pub fn set_timeout(&self, timeout: Duration) -> bool {
        let mut inner = self.inner.lock();
        if self.state.load() != ExecState::Pending {
            return false;
        }
        inner.timeout = timeout;
        true
    }

    /// Returns the current execution time budget.
    pub fn timeout(&self) -> Duration {
        self.inner.lock().timeout
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the event bus; subscribe to observe walks directly.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    // ---------------------------
    // Introspection
    // ---------------------------

    /// Returns the execution state.
    pub fn state(&self) -> ExecState {
        self.state.load()
    }

    /// Returns `true` once `execute` has started (until `reset`).
    pub fn is_executed(&self) -> bool {
        self.state.load() != ExecState::Pending
    }

    /// Returns the number of registered actions.
    pub fn len(&self) -> usize {
        self.inner.lock().actions.len()
    }

    /// Returns `true` if no actions are registered.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().actions.is_empty()
    }

    /// Returns action names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.inner
            .lock()
            .actions
            .iter()
            .map(|s| s.name().to_string())
            .collect()
    }

    // ---------------------------
    // Execution
    // ---------------------------

    /// Walks the registered actions in reverse order, bounded by the configured timeout.
    ///
    /// The first call performs the walk; every later call returns `Ok(())` without side effects.
    /// Cancelling `token` abandons the action in flight and skips the rest.
    pub async fn execute(&self, token: &CancellationToken) -> Result<(), CleanupError> {
        self.walk(token, None).await
    }

    /// Like [`execute`](Self::execute), but never runs past `deadline`.
    ///
    /// The configured timeout still applies when it expires earlier; it never extends `deadline`.
    pub async fn execute_until(
        &self,
        token: &CancellationToken,
        deadline: Instant,
    ) -> Result<(), CleanupError> {
        self.walk(token, Some(deadline)).await
    }

    /// Discards all actions and re-arms the registry for a new, independent walk.
    ///
    /// The configured timeout is kept.
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.actions.clear();
        self.state.reset();
        drop(inner);
        self.bus.publish(Event::new(EventKind::RegistryReset));
    }

    async fn walk(
        &self,
        token: &CancellationToken,
        outer: Option<Instant>,
    ) -> Result<(), CleanupError> {
        if !self.state.try_begin() {
            self.bus.publish(Event::new(EventKind::ExecutionSkipped));
            return Ok(());
        }

        let (snapshot, timeout) = {
            let inner = self.inner.lock();
            (inner.actions.clone(), inner.timeout)
        };
        let timeout = Some(timeout).filter(|d| *d > Duration::ZERO);
        let start = Instant::now();
        let walk_deadline = earliest(timeout.map(|d| start + d), outer);

        let mut started = Event::new(EventKind::ExecutionStarted).with_count(snapshot.len());
        if let Some(d) = timeout {
            started = started.with_timeout(d);
        }
        self.bus.publish(started);

        let scope = self.cfg.deadline_scope;
        let mut failures = Vec::new();
        let mut abandoned = Vec::new();

        for (idx, spec) in snapshot.iter().enumerate().rev() {
            let since = match scope {
                DeadlineScope::Shared => start,
                DeadlineScope::PerAction => Instant::now(),
            };
            let deadline = scope.action_deadline(walk_deadline, timeout, outer);
            let budget = deadline
                .map(|d| d.saturating_duration_since(since))
                .unwrap_or_default();

            let ran = run_action(spec, token, deadline, budget, &mut abandoned, &self.bus).await;
            let Err(error) = ran else {
                continue;
            };

            let policy = spec.policy();
            if policy.records_failure() {
                failures.push(ActionFailure {
                    name: spec.name().to_string(),
                    error,
                });
            }
            if policy.halts_walk() {
                self.bus.publish(
                    Event::new(EventKind::CriticalHalt)
                        .with_action(spec.name())
                        .with_count(idx),
                );
                break;
            }
        }

        if self.cfg.abort_abandoned {
            for handle in &abandoned {
                handle.abort();
            }
        }

        self.state.finish();
        self.bus
            .publish(Event::new(EventKind::ExecutionFinished).with_count(failures.len()));

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CleanupError::Aggregate { failures })
        }
    }

    // ---------------------------
    // Signal binding
    // ---------------------------

    /// Marks the registry as owned by a signal bridge; `false` if it already was.
    pub(crate) fn bind_signals(&self) -> bool {
        self.signal_bound
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl std::fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("actions", &self.names())
            .field("timeout", &self.timeout())
            .field("state", &self.state())
            .finish()
    }
}

/// Shared handle to a registry.
pub type RegistryRef = Arc<CleanupRegistry>;
