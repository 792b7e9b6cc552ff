//! Moderation error taxonomy.

use shared_types::{DenialReason, RecordId};
use thiserror::Error;
use tw_01_record_store::RecordStoreError;
use tw_03_notifications::NotificationError;

/// Errors returned by the Moderation Engine.
///
/// Only `StoreUnavailable` is a fault; the rest are normal negative outcomes
/// with a user-facing explanation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModerationError {
    #[error("Tree record not found: {0}")]
    NotFound(RecordId),

    #[error("{0}")]
    Forbidden(DenialReason),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage unavailable: {0}")]
    StoreUnavailable(String),
}

impl ModerationError {
    /// Text suitable for the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "This submission no longer exists".to_string(),
            Self::Forbidden(reason) => reason.to_string(),
            Self::InvalidInput(detail) => detail.clone(),
            Self::StoreUnavailable(_) => {
                "Something went wrong, please try again later".to_string()
            }
        }
    }
}

impl From<RecordStoreError> for ModerationError {
    fn from(err: RecordStoreError) -> Self {
        match err {
            RecordStoreError::NotFound(id) => Self::NotFound(id),
            RecordStoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<NotificationError> for ModerationError {
    fn from(err: NotificationError) -> Self {
        Self::StoreUnavailable(err.to_string())
    }
}
