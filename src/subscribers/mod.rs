//! # Event subscribers.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out used
//! by a [`CleanupRegistry`](crate::CleanupRegistry) to deliver its events.
//!
//! ```text
//! runner / registry ── publish(Event) ──► Bus ──► listener ──► SubscriberSet
//!                                                                  │
//!                                                   ┌──────────────┼──────────────┐
//!                                                   ▼              ▼              ▼
//!                                               LogWriter       Metrics        Custom
//! ```
//!
//! The built-in [`LogWriter`] (feature `logging`) forwards events to `tracing`.

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
