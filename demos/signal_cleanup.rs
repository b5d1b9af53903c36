//! # Example: signal_cleanup
//!
//! Runs cleanup when the process receives SIGINT/SIGTERM (Ctrl+C), then exits.
//!
//! Demonstrates how to:
//! - Bind a registry to OS signals with [`SignalBridge::enable`].
//! - Protect the main operation with a [`FaultGuard`] for the normal exit path.
//! - Keep the bridge handle alive for as long as signals should trigger cleanup.
//!
//! ## Flow
//! ```text
//! SignalBridge::enable(registry)
//!     ├─► Ctrl+C → registry.execute() → exit(1)
//!     └─► FaultGuard::run(work)
//!           └─► work finishes → registry.execute() → bridge.stop()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example signal_cleanup
//! # press Ctrl+C within 5 seconds to see signal-driven cleanup
//! ```

use std::sync::Arc;
use std::time::Duration;

use lifeguard::{CleanupRegistry, Config, FaultGuard, GuardError, Signal, SignalBridge};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let registry = Arc::new(CleanupRegistry::new(Config::default()));

    registry.register("release-port", |_ctx: CancellationToken| async {
        println!("[release-port] released");
        Ok(())
    });
    registry.register("stop-worker", |_ctx: CancellationToken| async {
        println!("[stop-worker] stopped");
        Ok(())
    });

    let signals = [Signal::Interrupt, Signal::Terminate];
    let bridge = SignalBridge::enable(Arc::clone(&registry), &signals)?;

    let guard =
        FaultGuard::new(Arc::clone(&registry), CancellationToken::new()).with_fault_recovery();
    let res: Result<(), GuardError<std::io::Error>> = guard
        .run(|| async {
            println!("working for 5s, press Ctrl+C to interrupt");
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;

    bridge.stop().await;
    res?;
    println!("done");
    Ok(())
}
