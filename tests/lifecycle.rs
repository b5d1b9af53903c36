//! End-to-end behaviour of the public API: registry walks, guards, the signal
//! bridge and the test adapter working against one shared registry.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::time::Duration;

use futures::FutureExt;
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use lifeguard::{
    ActionError, CleanupRegistry, Config, DeadlineScope, Event, EventKind, FailurePolicy,
    FaultGuard, GuardError, ScopeHost, ScopedCleanup, Signal, SignalBridge, SignalError, Subscribe,
    TestLifecycleAdapter,
};

type Log = Arc<Mutex<Vec<String>>>;

fn push(reg: &CleanupRegistry, log: &Log, name: &'static str) {
    let log = Arc::clone(log);
    reg.register(name, move |_ctx: CancellationToken| {
        let log = Arc::clone(&log);
        async move {
            log.lock().push(name.to_string());
            Ok(())
        }
    });
}

fn sleeper(reg: &CleanupRegistry, name: &'static str, d: Duration, policy: FailurePolicy) {
    reg.register_with(
        name,
        move |_ctx: CancellationToken| async move {
            tokio::time::sleep(d).await;
            Ok(())
        },
        policy,
    );
}

#[tokio::test]
async fn test_walk_is_lifo_and_runs_once() -> anyhow::Result<()> {
    let reg = CleanupRegistry::new(Config::default());
    let log: Log = Arc::default();
    for name in ["socket", "tempdir", "db", "container"] {
        push(&reg, &log, name);
    }

    reg.execute(&CancellationToken::new()).await?;
    reg.execute(&CancellationToken::new()).await?;

    assert_eq!(*log.lock(), vec!["container", "db", "tempdir", "socket"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_short_timeout_abandons_slow_action() {
    let reg = CleanupRegistry::new(Config::default());
    reg.set_timeout(Duration::from_millis(50));
    sleeper(&reg, "slow", Duration::from_millis(200), FailurePolicy::default());

    let started = Instant::now();
    let err = reg.execute(&CancellationToken::new()).await.unwrap_err();

    assert!(started.elapsed() < Duration::from_millis(200));
    assert!(err.contains("slow"));
    assert!(err.to_string().contains("slow: timed out after 50ms"));
}

#[tokio::test(start_paused = true)]
async fn test_shared_deadline_spans_the_whole_walk() {
    let reg = CleanupRegistry::new(Config::default());
    reg.set_timeout(Duration::from_millis(100));
    sleeper(&reg, "first-registered", Duration::from_millis(60), FailurePolicy::default());
    sleeper(&reg, "last-registered", Duration::from_millis(60), FailurePolicy::default());

    let err = reg.execute(&CancellationToken::new()).await.unwrap_err();

    assert_eq!(err.failures().len(), 1);
    assert!(err.contains("first-registered"));
}

#[tokio::test(start_paused = true)]
async fn test_per_action_scope_grants_fresh_budget() -> anyhow::Result<()> {
    let cfg = Config {
        timeout: Duration::from_millis(100),
        deadline_scope: DeadlineScope::PerAction,
        ..Config::default()
    };
    let reg = CleanupRegistry::new(cfg);
    sleeper(&reg, "a", Duration::from_millis(60), FailurePolicy::default());
    sleeper(&reg, "b", Duration::from_millis(60), FailurePolicy::default());

    reg.execute(&CancellationToken::new()).await?;
    Ok(())
}

#[tokio::test]
async fn test_policies_shape_the_aggregate() {
    let reg = CleanupRegistry::new(Config::default());
    let log: Log = Arc::default();

    push(&reg, &log, "never-runs");
    reg.register_critical("critical", |_ctx: CancellationToken| async {
        Err(ActionError::fail("unmount busy"))
    });
    reg.register("plain", |_ctx: CancellationToken| async { Err(ActionError::fail("leak")) });
    reg.register_with(
        "quiet",
        |_ctx: CancellationToken| async { Err(ActionError::fail("ignored")) },
        FailurePolicy::ignored(),
    );

    let err = reg.execute(&CancellationToken::new()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "cleanup failed: plain: leak; critical: unmount busy"
    );
    assert!(log.lock().is_empty());
}

#[tokio::test]
async fn test_reset_allows_an_independent_second_walk() -> anyhow::Result<()> {
    let reg = CleanupRegistry::new(Config::default());
    let log: Log = Arc::default();
    push(&reg, &log, "first");
    reg.execute(&CancellationToken::new()).await?;

    reg.reset();
    assert!(reg.is_empty());
    assert!(!reg.is_executed());

    push(&reg, &log, "second");
    reg.execute(&CancellationToken::new()).await?;

    assert_eq!(*log.lock(), vec!["first", "second"]);
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_triggers_run_each_action_once() {
    let reg = Arc::new(CleanupRegistry::new(Config::default()));
    let runs = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&runs);
    reg.register("count", move |_ctx: CancellationToken| {
        let r = Arc::clone(&r);
        async move {
            r.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            Ok(())
        }
    });

    let mut handles = Vec::new();
    for _ in 0..8 {
        let reg = Arc::clone(&reg);
        handles.push(tokio::spawn(async move {
            reg.execute(&CancellationToken::new()).await
        }));
    }
    for h in handles {
        assert!(h.await.unwrap().is_ok());
    }

    assert_eq!(runs.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_fault_guard_cleans_up_then_repanics() {
    let reg = Arc::new(CleanupRegistry::new(Config::default()));
    let log: Log = Arc::default();
    push(&reg, &log, "release-lock");

    let guard = FaultGuard::new(Arc::clone(&reg), CancellationToken::new()).with_fault_recovery();
    let result = AssertUnwindSafe(guard.run(|| async {
        if true {
            panic!("worker crashed");
        }
        Ok::<(), std::io::Error>(())
    }))
    .catch_unwind()
    .await;

    let payload = result.unwrap_err();
    assert_eq!(payload.downcast_ref::<&str>(), Some(&"worker crashed"));
    assert_eq!(*log.lock(), vec!["release-lock"]);
}

#[tokio::test]
async fn test_fault_guard_operation_error_wins() {
    let reg = Arc::new(CleanupRegistry::new(Config::default()));
    reg.register("leaky", |_ctx: CancellationToken| async { Err(ActionError::fail("still open")) });

    let guard = FaultGuard::new(Arc::clone(&reg), CancellationToken::new());
    let res: Result<(), GuardError<&str>> = guard.run(|| async { Err("bad input") }).await;

    assert!(matches!(res, Err(GuardError::Operation("bad input"))));
    assert!(reg.is_executed());
}

#[tokio::test]
async fn test_scoped_cleanup_shares_one_registry() -> anyhow::Result<()> {
    let reg = Arc::new(CleanupRegistry::new(Config::default()));
    let scope = ScopedCleanup::new(Arc::clone(&reg), CancellationToken::new());
    let log: Log = Arc::default();

    let l = Arc::clone(&log);
    let worker = scope.clone();
    tokio::spawn(async move {
        worker.register("from-task", move |_ctx: CancellationToken| {
            let l = Arc::clone(&l);
            async move {
                l.lock().push("from-task".into());
                Ok(())
            }
        });
    })
    .await?;

    scope.cleanup().await?;
    assert_eq!(*log.lock(), vec!["from-task"]);
    assert_eq!(reg.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_adapter_reports_failures_at_end_of_scope() {
    let host = Arc::new(ScopeHost::new());
    let cleanup = TestLifecycleAdapter::new(Arc::clone(&host));
    cleanup.register("leaky", |_ctx: CancellationToken| async {
        Err(ActionError::fail("still open"))
    });

    host.finish().await;

    assert_eq!(host.failures(), vec!["cleanup failed: leaky: still open".to_string()]);
    assert!(cleanup.registry().is_executed());
}

#[tokio::test]
async fn test_adapter_manual_mode_skips_hook() -> anyhow::Result<()> {
    let host = Arc::new(ScopeHost::new());
    let cleanup = TestLifecycleAdapter::new(Arc::clone(&host));
    let log: Log = Arc::default();
    push(cleanup.registry(), &log, "fixture");
    cleanup.disable_auto_exec();

    host.finish().await;
    assert!(log.lock().is_empty());

    cleanup.execute().await?;
    assert_eq!(*log.lock(), vec!["fixture"]);
    Ok(())
}

#[tokio::test]
async fn test_signal_bridge_runs_cleanup_then_exits() -> anyhow::Result<()> {
    let reg = Arc::new(CleanupRegistry::new(Config {
        exit_code: 3,
        ..Config::default()
    }));
    let log: Log = Arc::default();
    push(&reg, &log, "flush");

    let (fire, fired) = oneshot::channel::<()>();
    let (exited_tx, exited_rx) = oneshot::channel::<()>();
    let exited_tx = Mutex::new(Some(exited_tx));
    let code = Arc::new(AtomicI32::new(0));
    let c = Arc::clone(&code);

    let bridge = SignalBridge::with_trigger(
        Arc::clone(&reg),
        async move {
            let _ = fired.await;
            Signal::Terminate
        },
        Arc::new(move |status: i32| {
            c.store(status, Ordering::SeqCst);
            if let Some(tx) = exited_tx.lock().take() {
                let _ = tx.send(());
            }
        }),
    )?;

    assert!(matches!(
        SignalBridge::with_trigger(
            Arc::clone(&reg),
            std::future::pending::<Signal>(),
            Arc::new(|_: i32| {})
        ),
        Err(SignalError::AlreadyBound)
    ));

    let _ = fire.send(());
    tokio::time::timeout(Duration::from_secs(1), exited_rx).await??;

    assert!(bridge.has_fired());
    assert_eq!(code.load(Ordering::SeqCst), 3);
    assert_eq!(*log.lock(), vec!["flush"]);
    bridge.stop().await;
    Ok(())
}

struct Kinds(Arc<Mutex<Vec<EventKind>>>);

#[async_trait::async_trait]
impl Subscribe for Kinds {
    async fn on_event(&self, ev: &Event) {
        self.0.lock().push(ev.kind);
    }

    fn name(&self) -> &'static str {
        "kinds"
    }
}

#[tokio::test]
async fn test_subscribers_observe_the_walk() -> anyhow::Result<()> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let reg = CleanupRegistry::builder(Config::default())
        .with_subscriber(Arc::new(Kinds(Arc::clone(&seen))))
        .build();
    reg.register("noop", |_ctx: CancellationToken| async { Ok(()) });

    reg.execute(&CancellationToken::new()).await?;

    tokio::time::timeout(Duration::from_secs(1), async {
        while !seen.lock().contains(&EventKind::ExecutionFinished) {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;

    let seen = seen.lock().clone();
    assert_eq!(
        seen,
        vec![
            EventKind::ExecutionStarted,
            EventKind::ActionStarting,
            EventKind::ActionCompleted,
            EventKind::ExecutionFinished,
        ]
    );
    Ok(())
}
