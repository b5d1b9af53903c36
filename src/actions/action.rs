//! # Cleanup action trait.
//!
//! An [`Action`] has a stable [`name`](Action::name) and produces one future per
//! [`run`](Action::run). The future receives a [`CancellationToken`] bound to the
//! walk deadline: it is cancelled when the action is abandoned (deadline expired or
//! caller cancelled), so cooperative actions can stop instead of leaking.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::ActionError;

/// Boxed future returned by [`Action::run`].
pub type BoxActionFuture = Pin<Box<dyn Future<Output = Result<(), ActionError>> + Send + 'static>>;

/// Shared handle to an action.
pub type ActionRef = Arc<dyn Action>;

/// # Named, fallible teardown step.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use lifeguard::{Action, ActionError, BoxActionFuture};
///
/// struct RemoveTempDir;
///
/// impl Action for RemoveTempDir {
///     fn name(&self) -> &str { "remove-temp-dir" }
///
///     fn run(&self, ctx: CancellationToken) -> BoxActionFuture {
///         Box::pin(async move {
///             if ctx.is_cancelled() {
///                 return Err(ActionError::Canceled);
///             }
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Action: Send + Sync + 'static {
    /// Returns a stable, human-readable action name.
    fn name(&self) -> &str;

    /// Creates the future performing the teardown.
    ///
    /// The future is spawned on its own tokio task; it must be `'static`.
    fn run(&self, ctx: CancellationToken) -> BoxActionFuture;
}
