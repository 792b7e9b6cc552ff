//! # Inbound Ports (Driving Ports)

use crate::domain::entities::{NotificationEvent, NotificationKind};
use crate::domain::errors::NotificationError;
use crate::domain::value_objects::StagedNotification;
use shared_types::{NotificationId, PrincipalId, RecordId};

/// Primary API for the Notification Dispatcher.
pub trait NotificationApi: Send + Sync {
    /// Create and persist a notification for `recipient`.
    fn emit(
        &self,
        recipient: PrincipalId,
        sender: Option<PrincipalId>,
        kind: NotificationKind,
        subject: RecordId,
        message: String,
    ) -> Result<NotificationEvent, NotificationError>;

    /// Build a notification and the batch operations that persist it,
    /// without writing anything.
    fn stage(
        &self,
        recipient: PrincipalId,
        sender: Option<PrincipalId>,
        kind: NotificationKind,
        subject: RecordId,
        message: String,
    ) -> Result<StagedNotification, NotificationError>;

    /// Read a single entry.
    fn get(&self, id: NotificationId) -> Result<NotificationEvent, NotificationError>;

    /// All entries addressed to `principal`, newest first.
    fn list_for(&self, principal: PrincipalId) -> Result<Vec<NotificationEvent>, NotificationError>;

    /// Number of unread entries addressed to `principal`.
    fn count_unread(&self, principal: PrincipalId) -> Result<usize, NotificationError>;

    /// Mark one entry read. Already-read entries are left as they are.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no entry with this id
    /// - `Forbidden(NotRecipient)`: `principal` is not the recipient
    fn mark_read(
        &self,
        id: NotificationId,
        principal: PrincipalId,
    ) -> Result<NotificationEvent, NotificationError>;

    /// Mark every unread entry of `principal` read; returns how many changed.
    fn mark_all_read(&self, principal: PrincipalId) -> Result<usize, NotificationError>;

    /// Delete the subset of `ids` addressed to `principal`; returns how many
    /// were deleted. Unknown and foreign ids are ignored.
    fn delete(
        &self,
        ids: &[NotificationId],
        principal: PrincipalId,
    ) -> Result<usize, NotificationError>;
}

impl<T: NotificationApi + ?Sized> NotificationApi for std::sync::Arc<T> {
    fn emit(
        &self,
        recipient: PrincipalId,
        sender: Option<PrincipalId>,
        kind: NotificationKind,
        subject: RecordId,
        message: String,
    ) -> Result<NotificationEvent, NotificationError> {
        (**self).emit(recipient, sender, kind, subject, message)
    }

    fn stage(
        &self,
        recipient: PrincipalId,
        sender: Option<PrincipalId>,
        kind: NotificationKind,
        subject: RecordId,
        message: String,
    ) -> Result<StagedNotification, NotificationError> {
        (**self).stage(recipient, sender, kind, subject, message)
    }

    fn get(&self, id: NotificationId) -> Result<NotificationEvent, NotificationError> {
        (**self).get(id)
    }

    fn list_for(&self, principal: PrincipalId) -> Result<Vec<NotificationEvent>, NotificationError> {
        (**self).list_for(principal)
    }

    fn count_unread(&self, principal: PrincipalId) -> Result<usize, NotificationError> {
        (**self).count_unread(principal)
    }

    fn mark_read(
        &self,
        id: NotificationId,
        principal: PrincipalId,
    ) -> Result<NotificationEvent, NotificationError> {
        (**self).mark_read(id, principal)
    }

    fn mark_all_read(&self, principal: PrincipalId) -> Result<usize, NotificationError> {
        (**self).mark_all_read(principal)
    }

    fn delete(
        &self,
        ids: &[NotificationId],
        principal: PrincipalId,
    ) -> Result<usize, NotificationError> {
        (**self).delete(ids, principal)
    }
}
