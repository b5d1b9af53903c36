//! # Example: basic_cleanup
//!
//! Registers a handful of teardown steps, then runs them once with logging enabled.
//!
//! Demonstrates how to:
//! - Build a [`CleanupRegistry`] with the [`LogWriter`] subscriber.
//! - Register plain, critical and ignore-error actions.
//! - Bound the walk with a short timeout and inspect the aggregate error.
//!
//! ## Flow
//! ```text
//! register(flush) register(db) register(tempdir) register(cache)
//!     └─► execute()
//!          ├─► cache     (fails, ignored)
//!          ├─► tempdir   (ok)
//!          ├─► db        (ok)
//!          └─► flush     (slow, abandoned at the deadline)
//!     └─► Err("cleanup failed: flush-buffers: timed out after 300ms")
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=lifeguard=debug cargo run --example basic_cleanup --features logging
//! ```

use std::sync::Arc;
use std::time::Duration;

use lifeguard::{ActionError, CleanupRegistry, Config, FailurePolicy, LogWriter};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Route `tracing` output to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lifeguard=debug")),
        )
        .init();

    // 2. Registry with a logging subscriber and a short budget
    let cfg = Config {
        timeout: Duration::from_millis(300),
        ..Config::default()
    };
    let registry = CleanupRegistry::builder(cfg)
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();

    // 3. Setup: each acquired resource registers its teardown
    registry.register("flush-buffers", |ctx: CancellationToken| async move {
        tokio::select! {
            _ = ctx.cancelled() => Err(ActionError::Canceled),
            _ = tokio::time::sleep(Duration::from_secs(2)) => Ok(()),
        }
    });
    registry.register("close-db", |_ctx: CancellationToken| async {
        println!("[close-db] connection closed");
        Ok(())
    });
    registry.register_critical("remove-tempdir", |_ctx: CancellationToken| async {
        println!("[remove-tempdir] removed");
        Ok(())
    });
    registry.register_with(
        "evict-cache",
        |_ctx: CancellationToken| async { Err(ActionError::fail("cache already gone")) },
        FailurePolicy::ignored(),
    );

    // 4. Teardown
    match registry.execute(&CancellationToken::new()).await {
        Ok(()) => println!("cleanup complete"),
        Err(err) => println!("{err}"),
    }

    // 5. A second trigger is a no-op
    registry.execute(&CancellationToken::new()).await?;

    // Let the subscriber drain before exiting
    tokio::time::sleep(Duration::from_millis(50)).await;
    Ok(())
}
