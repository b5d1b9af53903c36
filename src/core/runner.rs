//! # Run a single cleanup action against a deadline.
//!
//! Executes one [`ActionSpec`] on its own tokio task and races its completion
//! against the deadline and the caller's cancellation token.
//!
//! ## Event flow
//!
//! ```text
//! Success:
//!   spawn(action.run(child)) → Ok(())            → ActionCompleted
//!
//! Failure / panic:
//!   spawn(action.run(child)) → Err(e) | JoinError → ActionFailed
//!
//! Deadline:
//!   deadline elapsed → cancel child → keep handle (abandoned)
//!                    → ActionTimedOut → ActionFailed(timeout)
//!
//! Caller cancelled:
//!   parent.cancelled() → cancel child → keep handle (abandoned)
//!                      → ActionFailed(canceled)
//! ```
//!
//! ## Rules
//! - Always publishes `ActionStarting` followed by **exactly one** of
//!   `ActionCompleted` / `ActionFailed` (a timeout adds `ActionTimedOut` first).
//! - The runner stops *waiting* on deadline; it never joins an abandoned action.
//!   The action's child token is cancelled so cooperative actions can exit.
//! - Abandoned handles are returned to the caller, which decides whether to abort them.
//!   An action spawned after its deadline had already passed is detached instead: it
//!   was never given a chance to run, so it is left to finish in the background.
//! - A parent token that is already cancelled short-circuits: the action is not started.

use std::future;
use std::time::Duration;

use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::{
    actions::ActionSpec,
    error::{ActionError, panic_message},
    events::{Bus, Event, EventKind},
};

/// Handle of an action that is still running after the runner gave up on it.
pub(crate) type Abandoned = JoinHandle<Result<(), ActionError>>;

enum Race {
    Joined(Result<Result<(), ActionError>, JoinError>),
    Deadline,
    Canceled,
}

/// Runs `spec` once, bounded by `deadline` (`None` = unbounded) and `parent`.
///
/// `budget` is only used to describe the timeout in errors and events.
pub(crate) async fn run_action(
    spec: &ActionSpec,
    parent: &CancellationToken,
    deadline: Option<Instant>,
    budget: Duration,
    abandoned: &mut Vec<Abandoned>,
    bus: &Bus,
) -> Result<(), ActionError> {
    let name = spec.name();
    bus.publish(Event::new(EventKind::ActionStarting).with_action(name));

    let res = if parent.is_cancelled() {
        Err(ActionError::Canceled)
    } else {
        // Started after the deadline: never raced, so never a candidate for abort.
        let late = deadline.is_some_and(|at| at <= Instant::now());
        let child = parent.child_token();
        let mut handle = tokio::spawn(spec.action().run(child.clone()));

        let race = tokio::select! {
            biased;
            joined = &mut handle => Race::Joined(joined),
            _ = elapsed(deadline) => Race::Deadline,
            _ = parent.cancelled() => Race::Canceled,
        };

        match race {
            Race::Joined(Ok(r)) => r,
            Race::Joined(Err(je)) => Err(join_error(je)),
            Race::Deadline => {
                child.cancel();
                if !late {
                    abandoned.push(handle);
                }
                bus.publish(
                    Event::new(EventKind::ActionTimedOut)
                        .with_action(name)
                        .with_timeout(budget),
                );
                Err(ActionError::Timeout { timeout: budget })
            }
            Race::Canceled => {
                child.cancel();
                abandoned.push(handle);
                Err(ActionError::Canceled)
            }
        }
    };

    match &res {
        Ok(()) => bus.publish(Event::new(EventKind::ActionCompleted).with_action(name)),
        Err(e) => bus.publish(
            Event::new(EventKind::ActionFailed)
                .with_action(name)
                .with_reason(e.to_string())
                .with_ignored(!spec.policy().records_failure()),
        ),
    }
    res
}

/// Completes once `deadline` has passed; never completes for `None`.
async fn elapsed(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => future::pending::<()>().await,
    }
}

fn join_error(je: JoinError) -> ActionError {
    if je.is_panic() {
        ActionError::Panicked {
            message: panic_message(&*je.into_panic()),
        }
    } else {
        ActionError::Canceled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::actions::ActionFn;
    use crate::policies::FailurePolicy;

    fn spec<F, Fut>(name: &'static str, f: F) -> ActionSpec
    where
        F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<(), ActionError>> + Send + 'static,
    {
        ActionSpec::new(ActionFn::arc(name, f), FailurePolicy::default())
    }

    #[tokio::test]
    async fn test_success_publishes_completed() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let mut abandoned = Vec::new();
        let s = spec("ok", |_ctx| async { Ok(()) });

        let parent = CancellationToken::new();
        let res = run_action(&s, &parent, None, Duration::ZERO, &mut abandoned, &bus).await;
        assert!(res.is_ok());
        assert!(abandoned.is_empty());
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::ActionStarting);
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::ActionCompleted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_abandons_and_cancels_child() {
        let bus = Bus::new(8);
        let mut abandoned = Vec::new();
        let s = spec("slow", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err(ActionError::Canceled)
        });
        let budget = Duration::from_millis(50);

        let res = run_action(
            &s,
            &CancellationToken::new(),
            Some(Instant::now() + budget),
            budget,
            &mut abandoned,
            &bus,
        )
        .await;
        assert_eq!(res, Err(ActionError::Timeout { timeout: budget }));
        assert_eq!(abandoned.len(), 1);

        // The child token was cancelled, so the cooperative action winds down by itself.
        let inner = abandoned.pop().unwrap().await.unwrap();
        assert_eq!(inner, Err(ActionError::Canceled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_deadline_detaches_instead_of_abandoning() {
        let bus = Bus::new(8);
        let mut abandoned = Vec::new();
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let r = Arc::clone(&ran);
        let s = spec("late", move |_ctx| {
            let r = Arc::clone(&r);
            async move {
                r.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
        });
        let budget = Duration::from_millis(50);
        let expired = Instant::now();
        tokio::time::advance(budget).await;

        let parent = CancellationToken::new();
        let res = run_action(&s, &parent, Some(expired), budget, &mut abandoned, &bus).await;
        assert_eq!(res, Err(ActionError::Timeout { timeout: budget }));
        assert!(abandoned.is_empty());

        tokio::task::yield_now().await;
        assert!(ran.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_panic_is_folded_into_error() {
        let bus = Bus::new(8);
        let mut abandoned = Vec::new();
        let s = spec("boom", |_ctx| async {
            if true {
                panic!("kaboom");
            }
            Ok(())
        });

        let parent = CancellationToken::new();
        let res = run_action(&s, &parent, None, Duration::ZERO, &mut abandoned, &bus).await;
        assert_eq!(
            res,
            Err(ActionError::Panicked {
                message: "kaboom".into()
            })
        );
    }

    #[tokio::test]
    async fn test_cancelled_parent_skips_action() {
        let bus = Bus::new(8);
        let mut abandoned = Vec::new();
        let ran = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let r = Arc::clone(&ran);
        let s = spec("skipped", move |_ctx| {
            let r = Arc::clone(&r);
            async move {
                r.store(true, std::sync::atomic::Ordering::SeqCst);
                Ok(())
            }
        });
        let parent = CancellationToken::new();
        parent.cancel();

        let res = run_action(&s, &parent, None, Duration::ZERO, &mut abandoned, &bus).await;
        assert_eq!(res, Err(ActionError::Canceled));
        tokio::task::yield_now().await;
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }
}
