//! # Cross-platform termination signals.
//!
//! **Unix platforms:** each [`Signal`] maps to a `tokio::signal::unix::SignalKind`.
//!
//! **Other platforms:** only `Ctrl-C` is observed (via [`tokio::signal::ctrl_c`]),
//! regardless of the requested set; it is reported as [`Signal::Interrupt`].

use std::future::Future;
use std::io;

/// Termination signal understood by [`SignalBridge`](crate::SignalBridge).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    /// `SIGINT` (Ctrl-C in a terminal).
    Interrupt,
    /// `SIGTERM` (default kill signal, used by systemd/Kubernetes).
    Terminate,
    /// `SIGQUIT`.
    Quit,
    /// `SIGHUP` (controlling terminal closed).
    Hangup,
}

impl Signal {
    /// Signals handled when none are requested explicitly.
    pub const DEFAULT: [Signal; 2] = [Signal::Interrupt, Signal::Terminate];

    /// Returns the conventional signal name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Quit => "SIGQUIT",
            Signal::Hangup => "SIGHUP",
        }
    }

    #[cfg(unix)]
    fn kind(self) -> tokio::signal::unix::SignalKind {
        use tokio::signal::unix::SignalKind;

        match self {
            Signal::Interrupt => SignalKind::interrupt(),
            Signal::Terminate => SignalKind::terminate(),
            Signal::Quit => SignalKind::quit(),
            Signal::Hangup => SignalKind::hangup(),
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registers listeners for `signals` and returns a future resolving to the first one received.
///
/// Registration happens eagerly so that failures surface here, not when awaiting.
/// An empty set means [`Signal::DEFAULT`]. Must be called inside a tokio runtime.
#[cfg(unix)]
pub(crate) fn listen(
    signals: &[Signal],
) -> io::Result<impl Future<Output = Signal> + Send + 'static> {
    use tokio::signal::unix::signal;

    let requested = if signals.is_empty() {
        &Signal::DEFAULT[..]
    } else {
        signals
    };

    let mut listeners = Vec::with_capacity(requested.len());
    for &sig in requested {
        listeners.push((sig, signal(sig.kind())?));
    }

    Ok(async move {
        let waits = listeners.iter_mut().map(|(sig, listener)| {
            let sig = *sig;
            Box::pin(async move {
                listener.recv().await;
                sig
            })
        });
        let (sig, _, _) = futures::future::select_all(waits).await;
        sig
    })
}

/// Registers a `Ctrl-C` listener; other signals are not observable on this platform.
#[cfg(not(unix))]
pub(crate) fn listen(
    _signals: &[Signal],
) -> io::Result<impl Future<Output = Signal> + Send + 'static> {
    Ok(async {
        let _ = tokio::signal::ctrl_c().await;
        Signal::Interrupt
    })
}
