//! # Audit Handler
//!
//! Writes one structured log line per committed change. Moderation events
//! are logged at `info`, everything else at `debug`.

use shared_bus::{EventFilter, InMemoryEventBus, Subscription, TreewatchEvent};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Subscribes to every topic and logs what was committed.
pub struct AuditHandler {
    subscription: Subscription,
}

impl AuditHandler {
    /// Subscribe immediately so nothing published after construction is missed.
    pub fn new(bus: &Arc<InMemoryEventBus>) -> Self {
        Self {
            subscription: bus.subscribe(EventFilter::all()),
        }
    }

    /// Log events until the bus closes or `shutdown` flips to `true`.
    ///
    /// Returns the number of events handled.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> usize {
        info!("[AuditHandler] Started");
        let mut handled = 0;

        loop {
            tokio::select! {
                event = self.subscription.recv() => match event {
                    Some(event) => {
                        Self::record(&event);
                        handled += 1;
                    }
                    None => break,
                },
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(handled, "[AuditHandler] Stopped");
        handled
    }

    fn record(event: &TreewatchEvent) {
        match event {
            TreewatchEvent::TreeSubmitted {
                record_id,
                owner,
                species,
            } => debug!(record = %record_id, owner = %owner, species = %species, "tree submitted"),
            TreewatchEvent::TreeFlagged {
                record_id,
                owner,
                flagged_by,
                reason,
                notification_id,
            } => info!(
                record = %record_id,
                owner = %owner,
                flagged_by = %flagged_by,
                reason = %reason,
                notification = %notification_id,
                "tree flagged"
            ),
            TreewatchEvent::TreeUnflagged {
                record_id,
                owner,
                moderator,
                notification_id,
            } => info!(
                record = %record_id,
                owner = %owner,
                moderator = %moderator,
                notification = %notification_id,
                "tree unflagged"
            ),
            TreewatchEvent::TreeDeleted {
                record_id,
                owner,
                moderator,
                notification_id,
            } => info!(
                record = %record_id,
                owner = %owner,
                moderator = %moderator,
                notification = %notification_id,
                "tree deleted"
            ),
            TreewatchEvent::TreeEdited {
                record_id,
                moderator,
            } => info!(record = %record_id, moderator = %moderator, "tree edited"),
            TreewatchEvent::NotificationsRead { recipient, count } => {
                debug!(recipient = %recipient, count, "notifications read")
            }
            TreewatchEvent::NotificationsDeleted { recipient, count } => {
                debug!(recipient = %recipient, count, "notifications deleted")
            }
        }
    }
}
