//! # Event fan-out to subscribers.
//!
//! [`SubscriberSet`] owns one delivery lane per subscriber. A lane is a bounded queue
//! plus a drain task; the registry listener offers every event to every lane and never
//! waits on a slow one.
//!
//! ```text
//! emit(event) ─┬─► lane "log"     [queue] ─► drain ─► on_event()
//!              └─► lane "metrics" [queue] ─► drain ─► on_event()
//!                    │ full/closed
//!                    └─► dropped += 1 ─► SubscriberOverflow { count: dropped }
//! ```
//!
//! Events keep their order within a lane. A panic inside `on_event` is caught by the
//! drain task, reported as `SubscriberPanicked`, and the lane keeps draining.
//! Overflow notices are never themselves reported as overflowing.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

use crate::error::panic_message;
use crate::events::{Bus, Event, EventKind};
use crate::subscribers::Subscribe;

/// Sending half of one subscriber's queue.
struct Lane {
    name: &'static str,
    tx: mpsc::Sender<Arc<Event>>,
    /// Events this lane has refused so far.
    dropped: AtomicUsize,
}

impl Lane {
    /// Queues `event` without waiting; the error names why it was refused.
    fn offer(&self, event: &Arc<Event>) -> Result<(), &'static str> {
        match self.tx.try_send(Arc::clone(event)) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err("full"),
            Err(TrySendError::Closed(_)) => Err("closed"),
        }
    }
}

/// Delivers queued events to `sub` until the lane is closed.
async fn drain(sub: Arc<dyn Subscribe>, mut rx: mpsc::Receiver<Arc<Event>>, bus: Bus) {
    while let Some(event) = rx.recv().await {
        let delivered = AssertUnwindSafe(sub.on_event(&event)).catch_unwind().await;
        if let Err(payload) = delivered {
            bus.publish(Event::subscriber_panicked(sub.name(), panic_message(&*payload)));
        }
    }
}

fn spawn_lane(sub: Arc<dyn Subscribe>, bus: Bus) -> (Lane, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(sub.queue_capacity().max(1));
    let lane = Lane {
        name: sub.name(),
        tx,
        dropped: AtomicUsize::new(0),
    };
    (lane, tokio::spawn(drain(sub, rx, bus)))
}

/// Fan-out coordinator for event subscribers.
pub struct SubscriberSet {
    lanes: Vec<Lane>,
    drains: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SubscriberSet {
    /// Opens one lane per subscriber.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(subs: Vec<Arc<dyn Subscribe>>, bus: Bus) -> Self {
        let (lanes, drains) = subs
            .into_iter()
            .map(|sub| spawn_lane(sub, bus.clone()))
            .unzip();
        Self { lanes, drains, bus }
    }

    /// Returns `true` if the set has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Offers an event to every lane.
    ///
    /// A refused event is lost for that subscriber only. Each refusal is reported with
    /// the running number of events that lane has lost.
    pub fn emit(&self, event: Event) {
        let notice = event.kind == EventKind::SubscriberOverflow;
        let event = Arc::new(event);

        for lane in &self.lanes {
            let Err(reason) = lane.offer(&event) else {
                continue;
            };
            let lost = lane.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            if !notice {
                self.bus
                    .publish(Event::subscriber_overflow(lane.name, reason).with_count(lost));
            }
        }
    }

    /// Closes every lane and waits until each drain task has delivered what was queued.
    pub async fn shutdown(self) {
        drop(self.lanes);
        for drain in self.drains {
            let _ = drain.await;
        }
    }
}
