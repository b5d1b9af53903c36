//! # Registry bound to one scope.
//!
//! [`ScopedCleanup`] pairs a registry with a fixed cancellation token so that code can
//! register teardown as it acquires resources and trigger it once at the end of the scope:
//!
//! ```text
//! let scope = ScopedCleanup::new(registry, token);
//! scope.register("a", ..);        // acquired first, released last
//! scope.register("b", ..);
//! ...
//! scope.must_cleanup().await;     // runs b, a; panics if anything failed
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::{
    core::CleanupRegistry,
    error::{ActionError, CleanupError},
    policies::FailurePolicy,
};

/// A registry bound to one cancellation token.
#[derive(Clone)]
pub struct ScopedCleanup {
    registry: Arc<CleanupRegistry>,
    token: CancellationToken,
}

impl ScopedCleanup {
    /// Binds `registry` to `token`.
    pub fn new(registry: Arc<CleanupRegistry>, token: CancellationToken) -> Self {
        Self { registry, token }
    }

    /// Forwards to [`CleanupRegistry::register`].
    pub fn register<F, Fut>(&self, name: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.registry.register(name, f);
    }

    /// Forwards to [`CleanupRegistry::register_critical`].
    pub fn register_critical<F, Fut>(&self, name: impl Into<Cow<'static, str>>, f: F)
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        self.registry.register_critical(name, f);
    }

    /// Forwards to [`CleanupRegistry::register_with`].
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

    /// Executes the bound registry with the bound token.
    pub async fn cleanup(&self) -> Result<(), CleanupError> {
        self.registry.execute(&self.token).await
    }

    /// Executes the bound registry and aborts the calling scope if anything failed.
    ///
    /// # Panics
    /// Panics with the aggregate failure message when cleanup reports an error.
    pub async fn must_cleanup(&self) {
        if let Err(err) = self.cleanup().await {
            tracing::error!(target: "lifeguard", error = %err, "mandatory cleanup failed");
            panic!("mandatory cleanup failed: {err}");
        }
    }

    /// Returns the bound registry.
    pub fn registry(&self) -> &Arc<CleanupRegistry> {
        &self.registry
    }

    /// Returns the bound token.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }
}
