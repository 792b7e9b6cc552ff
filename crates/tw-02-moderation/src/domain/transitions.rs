//! Record mutations for each allowed action.
//!
//! These assume the Guard already allowed the action; they never check it.

use super::value_objects::EditRequest;
use shared_types::{PrincipalId, Timestamp};
use tw_01_record_store::TreeRecord;
use tw_03_notifications::NotificationKind;

/// active → flagged.
pub fn flag(record: &TreeRecord, actor: PrincipalId, reason: &str, now: Timestamp) -> TreeRecord {
    let mut next = record.clone();
    next.is_flagged = true;
    next.flagged_by = Some(actor);
    next.flagged_at = Some(now);
    next.flag_reason = reason.trim().to_string();
    next
}

/// flagged → active. Clears all flag metadata.
pub fn unflag(record: &TreeRecord) -> TreeRecord {
    let mut next = record.clone();
    next.is_flagged = false;
    next.flagged_by = None;
    next.flagged_at = None;
    next.flag_reason.clear();
    next
}

/// active|flagged → deleted. Flag metadata is kept.
pub fn soft_delete(record: &TreeRecord) -> TreeRecord {
    let mut next = record.clone();
    next.is_deleted = true;
    next
}

/// Overwrite only the supplied descriptive fields.
pub fn edit(record: &TreeRecord, request: &EditRequest) -> TreeRecord {
    let mut next = record.clone();
    if let Some(species) = &request.species {
        next.species = species.trim().to_string();
    }
    if let Some(description) = &request.description {
        next.description = description.clone();
    }
    next
}

/// Notification kind emitted by a lifecycle transition.
pub fn notification_kind(action: super::guard::Action) -> Option<NotificationKind> {
    use super::guard::Action;
    match action {
        Action::Flag => Some(NotificationKind::TreeFlagged),
        Action::Unflag => Some(NotificationKind::TreeUnflagged),
        Action::Delete => Some(NotificationKind::TreeDeleted),
        Action::Edit => None,
    }
}
