//! # Protected-call wrapper.
//!
//! [`FaultGuard`] runs an async operation and then always walks its registry.
//!
//! ```text
//! run(op)
//!   ├─ fault recovery off (default):
//!   │     op().await ── Ok/Err ──► execute ──► result
//!   │          └─ panic ──────────► propagates, registry untouched
//!   └─ fault recovery on:
//!         Outcome::capture(op()) ── Ok/Err ──► execute ──► result
//!                   └─ Abort(payload) ──► FaultIntercepted ──► execute ──► resume_unwind(payload)
//! ```
//!
//! The operation's own error wins over the cleanup outcome; a cleanup failure that is
//! shadowed that way is logged, not returned. A panic is always re-raised as a panic,
//! never turned into an error value. The backtrace of the original panic is not kept.

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::{
    core::CleanupRegistry,
    error::{GuardError, panic_message},
    events::{Event, EventKind},
};

/// Tagged outcome of a protected call.
pub enum Outcome<T, E> {
    /// The operation returned successfully.
    Ok(T),
    /// The operation returned an error.
    Err(E),
    /// The operation panicked; holds the panic payload.
    Abort(Box<dyn Any + Send + 'static>),
}

impl<T, E> Outcome<T, E> {
    /// Polls `fut` to completion, capturing a panic instead of unwinding.
    pub async fn capture<Fut>(fut: Fut) -> Self
    where
        Fut: Future<Output = Result<T, E>>,
    {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(v)) => Outcome::Ok(v),
            Ok(Err(e)) => Outcome::Err(e),
            Err(payload) => Outcome::Abort(payload),
        }
    }

    /// Returns `true` for [`Outcome::Abort`].
    pub fn is_abort(&self) -> bool {
        matches!(self, Outcome::Abort(_))
    }
}

/// Runs a protected operation and walks the bound registry afterwards.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use lifeguard::{CleanupRegistry, Config, FaultGuard, GuardError};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let registry = Arc::new(CleanupRegistry::new(Config::default()));
///     registry.register("release-lock", |_ctx: CancellationToken| async { Ok(()) });
///
///     let guard = FaultGuard::new(Arc::clone(&registry), CancellationToken::new())
///         .with_fault_recovery();
///
///     let res: Result<u32, GuardError<std::io::Error>> = guard.run(|| async { Ok(42) }).await;
///     assert_eq!(res.unwrap(), 42);
///     assert!(registry.is_executed());
/// }
/// ```
pub struct FaultGuard {
    registry: Arc<CleanupRegistry>,
    token: CancellationToken,
    recover: bool,
}

impl FaultGuard {
    /// Creates a guard with fault recovery disabled.
    pub fn new(registry: Arc<CleanupRegistry>, token: CancellationToken) -> Self {
        Self {
            registry,
            token,
            recover: false,
        }
    }

    /// Enables fault recovery: a panicking operation triggers cleanup before being re-raised.
    pub fn enable_fault_recovery(&mut self) -> &mut Self {
        self.recover = true;
        self
    }

    /// Builder-style variant of [`enable_fault_recovery`](Self::enable_fault_recovery).
    pub fn with_fault_recovery(mut self) -> Self {
        self.recover = true;
        self
    }

    /// Returns `true` if fault recovery is enabled.
    pub fn fault_recovery(&self) -> bool {
        self.recover
    }

    /// Returns the bound registry.
    pub fn registry(&self) -> &Arc<CleanupRegistry> {
        &self.registry
    }

    /// Runs `op`, then the registry.
    ///
    /// # Panics
    /// Re-raises the operation's panic after cleanup when fault recovery is enabled;
    /// propagates it without cleanup otherwise.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, GuardError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let outcome = if self.recover {
            Outcome::capture(async move { op().await }).await
        } else {
            match op().await {
                Ok(v) => Outcome::Ok(v),
                Err(e) => Outcome::Err(e),
            }
        };

        match outcome {
            Outcome::Ok(v) => {
                self.registry.execute(&self.token).await?;
                Ok(v)
            }
            Outcome::Err(e) => {
                if let Err(cleanup) = self.registry.execute(&self.token).await {
                    tracing::warn!(
                        target: "lifeguard",
                        error = %cleanup,
                        "cleanup failed after operation error"
                    );
                }
                Err(GuardError::Operation(e))
            }
            Outcome::Abort(payload) => {
                let message = panic_message(&*payload);
                self.registry
                    .bus()
                    .publish(Event::new(EventKind::FaultIntercepted).with_reason(message.as_str()));
                if let Err(cleanup) = self.registry.execute(&self.token).await {
                    tracing::error!(
                        target: "lifeguard",
                        panic = %message,
                        error = %cleanup,
                        "cleanup failed after fault"
                    );
                }
                panic::resume_unwind(payload)
            }
        }
    }
}
