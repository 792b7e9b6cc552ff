//! # Event Subscriber

use crate::events::{EventFilter, TreewatchEvent};
use tokio::sync::broadcast;
use tracing::warn;

/// A filtered receiver on the bus. Dropping it unsubscribes.
pub struct Subscription {
    receiver: broadcast::Receiver<TreewatchEvent>,
    filter: EventFilter,
}

impl Subscription {
    pub(crate) fn new(receiver: broadcast::Receiver<TreewatchEvent>, filter: EventFilter) -> Self {
        Self { receiver, filter }
    }

    /// Next event matching the filter, or `None` once the bus is dropped.
    ///
    /// Events skipped because this subscriber lagged are logged, not returned.
    pub async fn recv(&mut self) -> Option<TreewatchEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.filter.matches(&event) => return Some(event),
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "bus subscriber lagged, events skipped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
