//! # Authorization Guard
//!
//! Pure decision layer. Never mutates state and never fails: every outcome
//! is a `Decision`.

use serde::{Deserialize, Serialize};
use shared_types::{DenialReason, Principal};
use std::fmt;
use tw_01_record_store::TreeRecord;

/// A transition a principal may request on a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Flag,
    Unflag,
    Delete,
    Edit,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Flag, Action::Unflag, Action::Delete, Action::Edit];

    /// Parse a wire/action name. Unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "flag" => Some(Self::Flag),
            "unflag" => Some(Self::Unflag),
            "delete" => Some(Self::Delete),
            "edit" => Some(Self::Edit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Unflag => "unflag",
            Self::Delete => "delete",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an authorization check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "reason")]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// Decide whether `principal` may perform `action` on `record`.
///
/// Rules are evaluated in order; the first failing rule names the reason.
pub fn authorize(principal: &Principal, action: Action, record: &TreeRecord) -> Decision {
    use DenialReason::*;

    let denial = match action {
        Action::Flag => {
            if record.is_deleted {
                Some(RecordDeleted)
            } else if record.is_owned_by(principal.id) {
                Some(OwnSubmission)
            } else if record.is_flagged {
                Some(AlreadyFlagged)
            } else {
                None
            }
        }
        Action::Unflag => {
            if !principal.is_moderator() {
                Some(ModeratorOnly)
            } else if record.is_deleted {
                Some(RecordDeleted)
            } else if !record.is_flagged {
                Some(NotFlagged)
            } else {
                None
            }
        }
        Action::Delete => {
            if !principal.is_moderator() {
                Some(ModeratorOnly)
            } else if record.is_deleted {
                Some(AlreadyDeleted)
            } else {
                None
            }
        }
        Action::Edit => {
            if !principal.is_moderator() {
                Some(ModeratorOnly)
            } else if record.is_deleted {
                Some(RecordDeleted)
            } else {
                None
            }
        }
    };

    match denial {
        Some(reason) => Decision::Denied(reason),
        None => Decision::Allowed,
    }
}

/// `authorize` for an action given by name; unknown names are denied.
pub fn authorize_named(principal: &Principal, action: &str, record: &TreeRecord) -> Decision {
    match Action::parse(action) {
        Some(action) => authorize(principal, action, record),
        None => Decision::Denied(DenialReason::UnknownAction),
    }
}
