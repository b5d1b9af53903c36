//! # Host test-framework contract.
//!
//! Any harness exposing the four capabilities of [`TestHost`] can drive a
//! [`TestLifecycleAdapter`](crate::TestLifecycleAdapter); nothing else is assumed.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::BoxFuture;
use parking_lot::Mutex;

/// Teardown callback run by the host when the current test case ends.
pub type EndOfScopeHook = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

/// Capabilities required from a host test framework.
pub trait TestHost: Send + Sync + 'static {
    /// Marks the caller as a helper so failures are attributed to the test, not the helper.
    fn mark_helper(&self);

    /// Registers a hook to run when the current test case ends.
    fn register_end_of_scope_hook(&self, hook: EndOfScopeHook);

    /// Records a failure without stopping the test.
    fn report_non_fatal_failure(&self, msg: &str);

    /// Records a failure and stops the test.
    fn report_fatal_failure(&self, msg: &str);
}

/// Minimal [`TestHost`] for async tests.
///
/// Hooks run in reverse registration order when [`finish`](Self::finish) is awaited.
/// A fatal failure panics, which fails the surrounding `#[tokio::test]`.
///
/// `finish` must be awaited explicitly at the end of the test body. A host dropped
/// with hooks still pending cannot run them (teardown is async and `Drop` is not),
/// so it logs a `tracing` warning naming how many hooks were skipped and discards them.
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use tokio_util::sync::CancellationToken;
/// use lifeguard::{ScopeHost, TestLifecycleAdapter};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let host = Arc::new(ScopeHost::new());
///     let cleanup = TestLifecycleAdapter::new(Arc::clone(&host));
///     cleanup.register("drop-fixture", |_ctx: CancellationToken| async { Ok(()) });
///
///     // ... test body ...
///
///     host.finish().await;
///     assert!(!host.failed());
/// }
/// ```
#[derive(Default)]
pub struct ScopeHost {
    hooks: Mutex<Vec<EndOfScopeHook>>,
    failures: Mutex<Vec<String>>,
    helpers: AtomicUsize,
}

impl ScopeHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ends the scope: runs every registered hook, most recent first.
    ///
    /// Hooks registered while finishing run too.
    pub async fn finish(&self) {
        loop {
            let next = self.hooks.lock().pop();
            match next {
                Some(hook) => hook().await,
                None => break,
            }
        }
    }

    /// Returns the recorded failure messages.
    pub fn failures(&self) -> Vec<String> {
        self.failures.lock().clone()
    }

    /// Returns `true` if any failure was reported.
    pub fn failed(&self) -> bool {
        !self.failures.lock().is_empty()
    }

    /// Returns the number of pending hooks.
    pub fn pending_hooks(&self) -> usize {
        self.hooks.lock().len()
    }

    /// Returns how many times `mark_helper` was called.
    pub fn helper_calls(&self) -> usize {
        self.helpers.load(Ordering::Relaxed)
    }
}

impl Drop for ScopeHost {
    fn drop(&mut self) {
        let pending = self.hooks.get_mut().len();
        if pending > 0 {
            tracing::warn!(
                target: "lifeguard",
                pending,
                "scope host dropped before finish(); end-of-scope hooks did not run"
            );
        }
    }
}

impl TestHost for ScopeHost {
    fn mark_helper(&self) {
        self.helpers.fetch_add(1, Ordering::Relaxed);
    }

    fn register_end_of_scope_hook(&self, hook: EndOfScopeHook) {
        self.hooks.lock().push(hook);
    }

    fn report_non_fatal_failure(&self, msg: &str) {
        tracing::error!(target: "lifeguard", "{msg}");
        self.failures.lock().push(msg.to_string());
    }

    fn report_fatal_failure(&self, msg: &str) {
        self.failures.lock().push(msg.to_string());
        panic!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_hooks_run_lifo_once() {
        let host = ScopeHost::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        for n in [1, 2, 3] {
            let log = Arc::clone(&log);
            host.register_end_of_scope_hook(Box::new(move || {
                async move {
                    log.lock().push(n);
                }
                .boxed()
            }));
        }

        host.finish().await;
        host.finish().await;
        assert_eq!(*log.lock(), vec![3, 2, 1]);
        assert_eq!(host.pending_hooks(), 0);
    }

    #[test]
    fn test_drop_discards_pending_hooks_without_running_them() {
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let host = ScopeHost::new();
        let r = Arc::clone(&ran);
        host.register_end_of_scope_hook(Box::new(move || {
            async move {
                r.store(true, Ordering::SeqCst);
            }
            .boxed()
        }));
        assert_eq!(host.pending_hooks(), 1);

        drop(host);
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(Arc::strong_count(&ran), 1);
    }

    #[test]
    fn test_non_fatal_failure_is_recorded() {
        let host = ScopeHost::new();
        host.report_non_fatal_failure("first");
        host.report_non_fatal_failure("second");
        assert!(host.failed());
        assert_eq!(host.failures(), vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    #[should_panic(expected = "fatal: boom")]
    fn test_fatal_failure_panics() {
        ScopeHost::new().report_fatal_failure("fatal: boom");
    }
}
