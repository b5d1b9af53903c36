//! # Event bus for broadcasting registry events.
//!
//! [`Bus`] wraps [`tokio::sync::broadcast`] so that publishing from the walk never blocks.
//!
//! ```text
//! Publishers:                         Subscriber (one per registry):
//!   CleanupRegistry ──┐
//!   runner          ──┼──► Bus ──► listener ──► SubscriberSet
//!   FaultGuard      ──┤
//!   SignalBridge    ──┘
//! ```
//!
//! ## Rules
//! - `publish()` never blocks and never fails; events without receivers are dropped.
//! - A single ring buffer of `capacity` events is shared by all receivers.
//! - Slow receivers observe `RecvError::Lagged(n)` and skip `n` events.

use tokio::sync::broadcast;

use super::event::Event;

/// Broadcast channel for registry events.
///
/// Cheap to clone (internally an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Event>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<Event>(capacity.max(1));
        Self { tx }
    }

    /// Publishes an event to all active receivers.
    pub fn publish(&self, ev: Event) {
        let _ = self.tx.send(ev);
    }

    /// Creates a receiver observing events sent after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Event::new(EventKind::RegistryReset));
    }

    #[tokio::test]
    async fn test_receiver_sees_later_events() {
        let bus = Bus::new(4);
        let mut rx = bus.subscribe();
        bus.publish(Event::new(EventKind::ExecutionStarted).with_count(3));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ExecutionStarted);
        assert_eq!(ev.count, Some(3));
    }
}
