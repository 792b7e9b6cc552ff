//! # Inbound Ports (Driving Ports)

use crate::domain::errors::ModerationError;
use crate::domain::guard::Decision;
use crate::domain::value_objects::{EditRequest, TransitionOutcome};
use shared_types::{Principal, RecordId};

/// Moderation operations. Every call carries the acting principal.
///
/// ## Errors (all operations)
///
/// - `InvalidInput`: malformed request, checked before the record is read
/// - `NotFound`: no record with this id
/// - `Forbidden(reason)`: the Guard denied the action; nothing was written
/// - `StoreUnavailable`: storage failed; nothing was written
pub trait ModerationApi: Send + Sync {
    /// Flag a record for review. Any principal except the owner.
    fn flag(
        &self,
        principal: &Principal,
        record_id: RecordId,
        reason: &str,
    ) -> Result<TransitionOutcome, ModerationError>;

    /// Clear a flag. Moderators only.
    fn unflag(
        &self,
        principal: &Principal,
        record_id: RecordId,
    ) -> Result<TransitionOutcome, ModerationError>;

    /// Soft delete a record. Moderators only; terminal.
    fn soft_delete(
        &self,
        principal: &Principal,
        record_id: RecordId,
    ) -> Result<TransitionOutcome, ModerationError>;

    /// Overwrite species and/or description. Moderators only; no notification.
    fn edit(
        &self,
        principal: &Principal,
        record_id: RecordId,
        request: &EditRequest,
    ) -> Result<TransitionOutcome, ModerationError>;

    /// Ask the Guard about a named action against the committed record,
    /// without performing it.
    fn check(
        &self,
        principal: &Principal,
        record_id: RecordId,
        action: &str,
    ) -> Result<Decision, ModerationError>;
}
