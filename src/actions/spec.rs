//! # Action specification.
//!
//! [`ActionSpec`] is the immutable record stored by the registry: the action itself
//! plus the [`FailurePolicy`] applied when it fails.

use crate::actions::action::ActionRef;
use crate::policies::FailurePolicy;

/// An action together with its failure policy.
///
/// ## Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use lifeguard::{ActionFn, ActionSpec, ActionError, FailurePolicy};
///
/// let spec = ActionSpec::new(
///     ActionFn::arc("unmount", |_ctx: CancellationToken| async { Ok::<_, ActionError>(()) }),
///     FailurePolicy::critical(),
/// );
/// assert_eq!(spec.name(), "unmount");
/// assert!(spec.policy().halts_walk());
/// ```
#[derive(Clone)]
pub struct ActionSpec {
    action: ActionRef,
    policy: FailurePolicy,
}

impl ActionSpec {
    /// Creates a new specification.
    pub fn new(action: ActionRef, policy: FailurePolicy) -> Self {
        Self { action, policy }
    }

    /// Returns reference to the action.
    pub fn action(&self) -> &ActionRef {
        &self.action
    }

    /// Convenience: returns the action name.
    pub fn name(&self) -> &str {
        self.action.name()
    }

    /// Returns the failure policy.
    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    /// Returns a new spec with the `critical` flag updated.
    pub fn with_critical(mut self, critical: bool) -> Self {
        self.policy.critical = critical;
        self
    }

    /// Returns a new spec with the `ignore_error` flag updated.
    pub fn with_ignore_error(mut self, ignore_error: bool) -> Self {
        self.policy.ignore_error = ignore_error;
        self
    }
}

impl std::fmt::Debug for ActionSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSpec")
            .field("name", &self.name())
            .field("policy", &self.policy)
            .finish()
    }
}
