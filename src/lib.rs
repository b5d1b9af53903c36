//! # lifeguard
//!
//! **lifeguard** is a scoped cleanup orchestrator for async Rust.
//!
//! Code registers named, fallible teardown actions while it acquires resources;
//! later exactly one trigger walks them in reverse registration order, once,
//! within a bounded time budget, whether the protected work succeeded, failed or panicked.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   register("a") register("b") register("c")        (setup, any thread)
//!         │             │             │
//!         ▼             ▼             ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  CleanupRegistry                                                  │
//! │  - actions: Vec<ActionSpec>   (append-only, Mutex)                │
//! │  - state: Pending → Executing → Done   (atomic CAS)               │
//! │  - timeout / DeadlineScope                                        │
//! │  - Bus (broadcast events)                                         │
//! └───────────────────────────────▲───────────────────────────────────┘
//!                                 │ execute(token)      exactly one effective call
//!       ┌───────────────┬─────────┴───────┬──────────────────────┐
//!       │               │                 │                      │
//!  explicit call   FaultGuard       SignalBridge        TestLifecycleAdapter
//!  ScopedCleanup   (panic → cleanup  (SIGINT/SIGTERM →   (host end-of-scope hook)
//!                   → resume_unwind)  cleanup → exit)
//! ```
//!
//! ### Walk
//! ```text
//! snapshot.rev():  c ──► b ──► a
//!   each action: tokio::spawn(action.run(child_token))
//!                select! { done, deadline, caller cancelled }
//!   Err + !ignore_error → "{name}: {cause}" into CleanupError::Aggregate
//!   Err + critical      → stop (actions registered earlier never run)
//!   deadline            → child token cancelled, task abandoned (left running)
//! ```
//!
//! ## Features
//! | Area           | Description                       | Key types / traits                     |
//! |----------------|-----------------------------------|----------------------------------------|
//! | Registry       | LIFO, run-once, bounded teardown. | [`CleanupRegistry`], [`ExecState`]     |
//! | Actions        | Async steps and failure policy.   | [`Action`], [`FailurePolicy`]          |
//! | Guards         | Cleanup after a call or a scope.  | [`FaultGuard`], [`ScopedCleanup`]      |
//! | Signals        | Cleanup then exit on OS signals.  | [`SignalBridge`], [`Signal`]           |
//! | Testing        | Cleanup on test harness teardown. | [`TestLifecycleAdapter`], [`TestHost`] |
//! | Subscriber API | Observe walks (logging, metrics). | [`Subscribe`], [`Event`]               |
//! | Errors         | Per-action and aggregate errors.  | [`ActionError`], [`CleanupError`]      |
//! | Configuration  | Timeout, deadline scope, abort.   | [`Config`]                             |
//!
//! ## Optional features
//! - `logging`: exports [`LogWriter`], a subscriber forwarding events to `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use lifeguard::{ActionError, CleanupRegistry, Config, FaultGuard, GuardError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(CleanupRegistry::new(Config::default()));
//!     registry.set_timeout(Duration::from_secs(5));
//!
//!     registry.register("remove-temp-dir", |_ctx: CancellationToken| async { Ok(()) });
//!     registry.register_critical("stop-container", |ctx: CancellationToken| async move {
//!         if ctx.is_cancelled() {
//!             return Err(ActionError::Canceled);
//!         }
//!         Ok(())
//!     });
//!
//!     let guard = FaultGuard::new(Arc::clone(&registry), CancellationToken::new())
//!         .with_fault_recovery();
//!
//!     let answer: Result<u32, GuardError<std::io::Error>> = guard.run(|| async { Ok(42) }).await;
//!     assert_eq!(answer?, 42);
//!     Ok(())
//! }
//! ```
mod actions;
mod config;
mod core;
mod error;
mod events;
mod guard;
mod policies;
mod signals;
mod subscribers;
mod testing;

// ---- Public re-exports ----

pub use actions::{Action, ActionFn, ActionRef, ActionSpec, BoxActionFuture};
pub use config::{Config, DEFAULT_TIMEOUT};
pub use core::{CleanupRegistry, ExecState, RegistryBuilder, RegistryRef};
pub use error::{ActionError, ActionFailure, CleanupError, GuardError, SignalError};
pub use events::{Bus, Event, EventKind};
pub use guard::{FaultGuard, Outcome, ScopedCleanup};
pub use policies::{DeadlineScope, FailurePolicy};
pub use signals::{ExitHook, Signal, SignalBridge};
pub use subscribers::{Subscribe, SubscriberSet};
pub use testing::{EndOfScopeHook, ScopeHost, TestHost, TestLifecycleAdapter};

// Optional: expose a built-in subscriber that logs through `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
