//! Registry events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted while a registry is armed, walked and reset.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `CleanupRegistry`, `runner::run_action`, `FaultGuard`,
//!   `SignalBridge`, `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the registry's listener, which fans events out to its `SubscriberSet`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
