//! # Signal bridge: OS termination signal → cleanup → exit.
//!
//! ```text
//! SignalBridge::enable(registry, signals)
//!   ├─► registry.bind_signals()            one bridge per registry, ever
//!   └─► spawn listener:
//!         select! {
//!           stop.cancelled()  → return (idle, handling not re-armed)
//!           first signal      → SignalReceived
//!                             → registry.execute(fresh token)   (configured timeout)
//!                             → failures logged, never returned
//!                             → exit(Config::exit_code)
//!         }
//! ```
//!
//! The bridge is an owned handle: dropping it unsubscribes, like [`SignalBridge::stop`]
//! without waiting for the listener.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    core::CleanupRegistry,
    error::SignalError,
    events::{Event, EventKind},
    signals::kind::{Signal, listen},
};

/// Called with the configured exit code after signal-triggered cleanup.
pub type ExitHook = Arc<dyn Fn(i32) + Send + Sync>;

/// Owned subscription binding OS termination signals to a registry.
///
/// ## Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use lifeguard::{CleanupRegistry, Config, Signal, SignalBridge};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let registry = Arc::new(CleanupRegistry::new(Config::default()));
///     registry.register("remove-pidfile", |_ctx: CancellationToken| async { Ok(()) });
///
///     let bridge = SignalBridge::enable(Arc::clone(&registry), &Signal::DEFAULT)?;
///     // ... run until done or until SIGINT/SIGTERM ends the process ...
///     bridge.stop().await;
///     registry.execute(&CancellationToken::new()).await?;
///     Ok(())
/// }
/// ```
#[must_use = "dropping the bridge unsubscribes from signals"]
pub struct SignalBridge {
    stop: CancellationToken,
    listener: Option<JoinHandle<()>>,
    fired: Arc<AtomicBool>,
}

impl SignalBridge {
    /// Subscribes to `signals` (empty = [`Signal::DEFAULT`]) and exits the process after cleanup.
    ///
    /// Must be called inside a tokio runtime.
    pub fn enable(registry: Arc<CleanupRegistry>, signals: &[Signal]) -> Result<Self, SignalError> {
        let trigger = listen(signals)?;
        Self::with_trigger(registry, trigger, Arc::new(exit_process))
    }

    /// Subscribes with a custom trigger future and exit hook.
    ///
    /// The trigger stands in for "first matching signal received"; the hook replaces
    /// process termination. Useful for embedding and for tests.
    pub fn with_trigger<T>(
        registry: Arc<CleanupRegistry>,
        trigger: T,
        exit: ExitHook,
    ) -> Result<Self, SignalError>
    where
        T: Future<Output = Signal> + Send + 'static,
    {
        if !registry.bind_signals() {
            return Err(SignalError::AlreadyBound);
        }

        let stop = CancellationToken::new();
        let fired = Arc::new(AtomicBool::new(false));
        let listener = tokio::spawn(Self::listen_once(
            registry,
            trigger,
            exit,
            stop.clone(),
            Arc::clone(&fired),
        ));

        Ok(Self {
            stop,
            listener: Some(listener),
            fired,
        })
    }

    async fn listen_once<T>(
        registry: Arc<CleanupRegistry>,
        trigger: T,
        exit: ExitHook,
        stop: CancellationToken,
        fired: Arc<AtomicBool>,
    ) where
        T: Future<Output = Signal> + Send + 'static,
    {
        let sig = tokio::select! {
            _ = stop.cancelled() => return,
            sig = trigger => sig,
        };

        fired.store(true, Ordering::Release);
        registry
            .bus()
            .publish(Event::new(EventKind::SignalReceived).with_reason(sig.as_str()));
        tracing::warn!(
            target: "lifeguard",
            signal = %sig,
            "termination signal received, running cleanup"
        );

        if let Err(err) = registry.execute(&CancellationToken::new()).await {
            tracing::error!(
                target: "lifeguard",
                signal = %sig,
                error = %err,
                "signal-triggered cleanup failed"
            );
        }

        let code = registry.config().exit_code;
        tracing::warn!(target: "lifeguard", code, "exiting after signal");
        exit(code);
    }

    /// Returns `true` once a signal has been received.
    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Unsubscribes and waits for the listener to go idle.
    ///
    /// If a signal already fired, this waits for its cleanup to finish.
    /// The registry stays bound: a new bridge cannot be enabled on it.
    pub async fn stop(mut self) {
        self.stop.cancel();
        if let Some(listener) = self.listener.take() {
            let _ = listener.await;
        }
    }
}

fn exit_process(code: i32) {
    std::process::exit(code)
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        self.stop.cancel();
    }
}
