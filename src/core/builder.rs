use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};
use super::registry::CleanupRegistry;

/// Builder for a [`CleanupRegistry`] with event subscribers.
pub struct RegistryBuilder {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl RegistryBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive registry events through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds a single subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the registry.
    ///
    /// When subscribers are configured this spawns their workers plus one listener
    /// forwarding bus events to them, so it must be called inside a tokio runtime.
    /// The listener exits when the registry is dropped.
    pub fn build(self) -> Arc<CleanupRegistry> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());

        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let stop = CancellationToken::new();
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            let mut rx = bus.subscribe();
            let token = stop.clone();
            tokio::spawn(async move {
                loop {
                    tokio::select! {
                        _ = token.cancelled() => break,
                        msg = rx.recv() => match msg {
                            Ok(ev) => set.emit(ev),
                            Err(RecvError::Lagged(_)) => continue,
                            Err(RecvError::Closed) => break,
                        }
                    }
                }
                set.shutdown().await;
            });
            Some(stop.drop_guard())
        };

        Arc::new(CleanupRegistry::with_bus(self.cfg, bus, listener))
    }
}
