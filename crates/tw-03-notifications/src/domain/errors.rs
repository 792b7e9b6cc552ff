use shared_types::{DenialReason, KVStoreError, NotificationId};
use thiserror::Error;

/// Errors from the Notification Dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("Notification not found: {0}")]
    NotFound(NotificationId),

    #[error("Forbidden: {0}")]
    Forbidden(DenialReason),

    #[error("Notification store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Corrupt notification data: {0}")]
    Corrupted(String),
}

impl From<KVStoreError> for NotificationError {
    fn from(err: KVStoreError) -> Self {
        match err {
            KVStoreError::IOError { message } => Self::StoreUnavailable(message),
            KVStoreError::Serialization { message } => Self::Corrupted(message),
            KVStoreError::Conflict { key } => {
                Self::StoreUnavailable(format!("unresolved write conflict on {key:02x?}"))
            }
        }
    }
}
