//! # Treewatch Events
//!
//! Post-commit notices published by the application facade. Each event
//! describes a change that is already durable; consumers (audit logging,
//! cache invalidation) never affect the outcome of the operation.

use serde::{Deserialize, Serialize};
use shared_types::{NotificationId, PrincipalId, RecordId};

/// All events that can be published to the event bus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TreewatchEvent {
    // =========================================================================
    // SUBSYSTEM 1: RECORD STORE
    // =========================================================================
    /// A new tree record was submitted.
    TreeSubmitted {
        record_id: RecordId,
        owner: PrincipalId,
        species: String,
    },

    // =========================================================================
    // SUBSYSTEM 2: MODERATION
    // =========================================================================
    /// A record was flagged for review.
    TreeFlagged {
        record_id: RecordId,
        owner: PrincipalId,
        flagged_by: PrincipalId,
        reason: String,
        notification_id: NotificationId,
    },

    /// A moderator cleared a flag.
    TreeUnflagged {
        record_id: RecordId,
        owner: PrincipalId,
        moderator: PrincipalId,
        notification_id: NotificationId,
    },

    /// A moderator soft deleted a record.
    TreeDeleted {
        record_id: RecordId,
        owner: PrincipalId,
        moderator: PrincipalId,
        notification_id: NotificationId,
    },

    /// A moderator edited species/description.
    TreeEdited {
        record_id: RecordId,
        moderator: PrincipalId,
    },

    // =========================================================================
    // SUBSYSTEM 3: NOTIFICATIONS
    // =========================================================================
    /// A recipient marked notifications read.
    NotificationsRead { recipient: PrincipalId, count: usize },

    /// A recipient deleted notifications.
    NotificationsDeleted { recipient: PrincipalId, count: usize },
}

impl TreewatchEvent {
    /// Get the topic for this event (for filtering).
    #[must_use]
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::TreeSubmitted { .. } => EventTopic::Submissions,
            Self::TreeFlagged { .. }
            | Self::TreeUnflagged { .. }
            | Self::TreeDeleted { .. }
            | Self::TreeEdited { .. } => EventTopic::Moderation,
            Self::NotificationsRead { .. } | Self::NotificationsDeleted { .. } => {
                EventTopic::Notifications
            }
        }
    }

    /// Get the originating subsystem ID.
    #[must_use]
    pub fn source_subsystem(&self) -> u8 {
        match self.topic() {
            EventTopic::Submissions => 1,
            EventTopic::Moderation => 2,
            _ => 3,
        }
    }

    /// Record this event is about, if any.
    #[must_use]
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::TreeSubmitted { record_id, .. }
            | Self::TreeFlagged { record_id, .. }
            | Self::TreeUnflagged { record_id, .. }
            | Self::TreeDeleted { record_id, .. }
            | Self::TreeEdited { record_id, .. } => Some(*record_id),
            Self::NotificationsRead { .. } | Self::NotificationsDeleted { .. } => None,
        }
    }
}

/// Event topics for subscription filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// Subsystem 1 events.
    Submissions,
    /// Subsystem 2 events.
    Moderation,
    /// Subsystem 3 events.
    Notifications,
    /// All events (no filtering).
    All,
}

/// Filter for subscribing to specific events.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    /// Topics to include. Empty means all topics.
    pub topics: Vec<EventTopic>,
    /// Source subsystems to include. Empty means all sources.
    pub source_subsystems: Vec<u8>,
}

impl EventFilter {
    /// Create a filter that accepts all events.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Create a filter for specific topics.
    #[must_use]
    pub fn topics(topics: Vec<EventTopic>) -> Self {
        Self {
            topics,
            source_subsystems: Vec::new(),
        }
    }

    /// Create a filter for events from specific subsystems.
    #[must_use]
    pub fn from_subsystems(subsystems: Vec<u8>) -> Self {
        Self {
            topics: Vec::new(),
            source_subsystems: subsystems,
        }
    }

    /// Check if an event matches this filter.
    #[must_use]
    pub fn matches(&self, event: &TreewatchEvent) -> bool {
        let topic_match = self.topics.is_empty()
            || self.topics.contains(&EventTopic::All)
            || self.topics.contains(&event.topic());

        let source_match = self.source_subsystems.is_empty()
            || self.source_subsystems.contains(&event.source_subsystem());

        topic_match && source_match
    }
}
