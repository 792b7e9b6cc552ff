//! # Event Publisher
//!
//! The facade publishes here after every committed change.

use crate::events::{EventFilter, TreewatchEvent};
use crate::subscriber::Subscription;
use crate::DEFAULT_CHANNEL_CAPACITY;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Publishing side of the bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Returns the number of live subscriptions the event reached.
    async fn publish(&self, event: TreewatchEvent) -> usize;

    /// Events attempted since start, delivered or not.
    fn events_published(&self) -> u64;
}

/// Broadcast-backed bus shared by the facade and the audit handler.
///
/// Delivery is best-effort. With no subscription attached an event is
/// dropped; a subscriber that falls more than `DEFAULT_CHANNEL_CAPACITY`
/// events behind skips the oldest ones.
pub struct InMemoryEventBus {
    sender: broadcast::Sender<TreewatchEvent>,
    events_published: AtomicU64,
}

impl InMemoryEventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            sender,
            events_published: AtomicU64::new(0),
        }
    }

    /// Events published after this call that match `filter` are delivered.
    #[must_use]
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(topics = ?filter.topics, "bus subscription opened");
        Subscription::new(self.sender.subscribe(), filter)
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventPublisher for InMemoryEventBus {
    async fn publish(&self, event: TreewatchEvent) -> usize {
        let topic = event.topic();
        let source = event.source_subsystem();
        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(topic = ?topic, source, receivers, "event published");
                receivers
            }
            Err(_) => {
                warn!(topic = ?topic, source, "event dropped, no subscribers");
                0
            }
        }
    }

    fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }
}
