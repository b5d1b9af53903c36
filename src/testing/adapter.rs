//! # Test lifecycle adapter.
//!
//! [`TestLifecycleAdapter`] owns a registry and, at construction, registers one
//! end-of-scope hook with the host:
//!
//! ```text
//! host end-of-scope
//!   └─► hook
//!         ├─ auto exec disabled → nothing
//!         └─ enabled → registry.execute()
//!                        └─ Err(aggregate) → host.report_non_fatal_failure
//! ```
//!
//! [`disable_auto_exec`](TestLifecycleAdapter::disable_auto_exec) turns the hook into a
//! no-op so that [`execute`](TestLifecycleAdapter::execute) can be driven by hand.
//! The hook holds the host weakly, so a dropped host does not keep the registry alive.

use std::borrow::Cow;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::FutureExt;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    core::CleanupRegistry,
    error::{ActionError, CleanupError},
    policies::FailurePolicy,
    testing::host::TestHost,
};

/// Binds a cleanup registry to a host test framework.
///
/// Automatic cleanup happens only when the host actually runs its end-of-scope hooks.
/// With [`ScopeHost`](crate::ScopeHost) that means awaiting
/// [`ScopeHost::finish`](crate::ScopeHost::finish) before the test returns; a host that
/// is dropped instead never executes the registry. Call [`execute`](Self::execute) or
/// [`must_execute`](Self::must_execute) directly when no such host step exists.
pub struct TestLifecycleAdapter<H: TestHost> {
    host: Arc<H>,
    registry: Arc<CleanupRegistry>,
    token: CancellationToken,
    auto_exec: Arc<AtomicBool>,
}

impl<H: TestHost> TestLifecycleAdapter<H> {
    /// Creates an adapter with the default configuration and hooks it into `host`.
    pub fn new(host: Arc<H>) -> Self {
        Self::with_config(host, Config::default())
    }

    /// Creates an adapter with an explicit configuration.
    pub fn with_config(host: Arc<H>, cfg: Config) -> Self {
        Self::with_registry(host, Arc::new(CleanupRegistry::new(cfg)))
    }

    /// Creates an adapter around an existing registry (e.g. one built with subscribers).
    pub fn with_registry(host: Arc<H>, registry: Arc<CleanupRegistry>) -> Self {
        let token = CancellationToken::new();
        let auto_exec = Arc::new(AtomicBool::new(true));

        let weak_host: Weak<H> = Arc::downgrade(&host);
        let hook_registry = Arc::clone(&registry);
        let hook_token = token.clone();
        let hook_auto = Arc::clone(&auto_exec);
        host.register_end_of_scope_hook(Box::new(move || {
            async move {
                if !hook_auto.load(Ordering::Acquire) {
                    return;
                }
                let result = hook_registry.execute(&hook_token).await;
                if let (Err(err), Some(host)) = (result, weak_host.upgrade()) {
                    host.mark_helper();
                    host.report_non_fatal_failure(&err.to_string());
                }
            }
            .boxed()
        }));

        Self {
            host,
            registry,
            token,
            auto_exec,
        }
    }

    /// Turns the end-of-scope hook into a no-op.
    pub fn disable_auto_exec(&self) {
        self.auto_exec.store(false, Ordering::Release);
    }

    /// Returns `true` unless [`disable_auto_exec`](Self::disable_auto_exec) was called.
    pub fn auto_exec(&self) -> bool {
        self.auto_exec.load(Ordering::Acquire)
    }

    /// Registers an action with the default policy.
    pub fn register<F, Fut>(&self, name: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.registry.register(name, f);
    }

    /// Registers an action whose failure halts the walk.
    pub fn register_critical<F, Fut>(&self, name: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.registry.register_critical(name, f);
    }

    /// Registers an action with an explicit policy.
    pub fn register_with<F, Fut>(
        &self,
        name: impl Into<Cow<'static, str>>,
        f: F,
        policy: FailurePolicy,
    ) where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.registry.register_with(name, f, policy);
    }

    /// Forwards to [`CleanupRegistry::set_timeout`].
    pub fn set_timeout(&self, timeout: Duration) -> bool {
        self.registry.set_timeout(timeout)
    }

    /// Executes the registry now.
    pub async fn execute(&self) -> Result<(), CleanupError> {
        self.registry.execute(&self.token).await
    }

    /// Executes the registry now and reports any failure to the host as fatal.
    pub async fn must_execute(&self) {
        if let Err(err) = self.execute().await {
            self.host.mark_helper();
            self.host.report_fatal_failure(&err.to_string());
        }
    }

    /// Returns the underlying registry.
    pub fn registry(&self) -> &Arc<CleanupRegistry> {
        &self.registry
    }

    /// Returns the host.
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }
}
