//! # Function-backed action (`ActionFn`)
//!
//! [`ActionFn`] wraps a closure `F: Fn(CancellationToken) -> Fut`, producing a fresh
//! future per run. The closure is `Fn` so that the same registry can be re-armed by
//! [`reset`](crate::CleanupRegistry::reset) and re-register clones of it.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use lifeguard::{ActionFn, ActionRef, ActionError};
//!
//! let a: ActionRef = ActionFn::arc("close-socket", |_ctx: CancellationToken| async move {
//!     Ok::<_, ActionError>(())
//! });
//!
//! assert_eq!(a.name(), "close-socket");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::actions::action::{Action, BoxActionFuture};
use crate::error::ActionError;

/// Closure-backed action implementation.
#[derive(Debug)]
pub struct ActionFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> ActionFn<F> {
    /// Creates a new closure-backed action.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the action and returns it as a shared handle (`Arc<dyn Action>`).
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F, Fut> Action for ActionFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), ActionError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, ctx: CancellationToken) -> BoxActionFuture {
        Box::pin((self.f)(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_fresh_future_per_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let action = ActionFn::new("count", move |_ctx: CancellationToken| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        action.run(CancellationToken::new()).await.unwrap();
        action.run(CancellationToken::new()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_token_is_passed_through() {
        let action = ActionFn::new("observe", |ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                Err(ActionError::Canceled)
            } else {
                Ok(())
            }
        });

        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(action.run(token).await, Err(ActionError::Canceled));
    }
}
