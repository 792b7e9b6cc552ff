use serde::{Deserialize, Serialize};
use shared_types::{NotificationId, PrincipalId, RecordId, Timestamp};
use std::fmt;

/// Which transition produced a notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    TreeFlagged,
    TreeUnflagged,
    TreeDeleted,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TreeFlagged => "tree_flagged",
            Self::TreeUnflagged => "tree_unflagged",
            Self::TreeDeleted => "tree_deleted",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted notification entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub id: NotificationId,
    pub recipient: PrincipalId,
    /// `None` for system-generated entries.
    pub sender: Option<PrincipalId>,
    pub kind: NotificationKind,
    /// Record that triggered the entry. May dangle.
    pub subject: RecordId,
    /// Rendered at creation time, never recomputed.
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl NotificationEvent {
    pub fn is_for(&self, principal: PrincipalId) -> bool {
        self.recipient == principal
    }

    /// Newest first; ties broken by id descending.
    pub fn newest_first(a: &Self, b: &Self) -> std::cmp::Ordering {
        (b.created_at, b.id).cmp(&(a.created_at, a.id))
    }
}
