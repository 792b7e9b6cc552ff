//! Message templates rendered when a notification is created.

use super::entities::NotificationKind;

/// Render the recipient-facing text for a transition on a `species` record.
///
/// `reason` is only used for `TreeFlagged`, and only when non-blank.
pub fn render_message(kind: NotificationKind, species: &str, reason: &str) -> String {
    match kind {
        NotificationKind::TreeFlagged => {
            let reason = reason.trim();
            if reason.is_empty() {
                format!("Your {species} submission was flagged for review.")
            } else {
                format!("Your {species} submission was flagged for review. Reason: {reason}")
            }
        }
        NotificationKind::TreeUnflagged => {
            format!("Your {species} submission was reviewed and restored.")
        }
        NotificationKind::TreeDeleted => {
            format!("Your {species} submission was removed by a moderator.")
        }
    }
}
