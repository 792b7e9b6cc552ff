//! Unified error taxonomy at the application boundary.

use shared_types::DenialReason;
use thiserror::Error;
use tw_01_record_store::RecordStoreError;
use tw_02_moderation::ModerationError;
use tw_03_notifications::NotificationError;

/// Errors returned by `TreewatchApp`.
///
/// `StoreUnavailable` is retryable by the caller; nothing was written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(DenialReason),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApiError {
    /// Stable machine-readable kind for the transport layer.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::InvalidInput(_) => "invalid_input",
            Self::StoreUnavailable(_) => "store_unavailable",
        }
    }

    /// Text suitable for the end user. Storage failures stay generic.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(_) => "The requested item no longer exists".to_string(),
            Self::Forbidden(reason) => reason.to_string(),
            Self::InvalidInput(detail) => detail.clone(),
            Self::StoreUnavailable(_) => "Something went wrong, please try again later".to_string(),
        }
    }
}

impl From<ModerationError> for ApiError {
    fn from(err: ModerationError) -> Self {
        match err {
            ModerationError::NotFound(id) => Self::NotFound(format!("tree {id}")),
            ModerationError::Forbidden(reason) => Self::Forbidden(reason),
            ModerationError::InvalidInput(msg) => Self::InvalidInput(msg),
            ModerationError::StoreUnavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}

impl From<RecordStoreError> for ApiError {
    fn from(err: RecordStoreError) -> Self {
        match err {
            RecordStoreError::NotFound(id) => Self::NotFound(format!("tree {id}")),
            RecordStoreError::InvalidInput(msg) => Self::InvalidInput(msg),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}

impl From<NotificationError> for ApiError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::NotFound(id) => Self::NotFound(format!("notification {id}")),
            NotificationError::Forbidden(reason) => Self::Forbidden(reason),
            other => Self::StoreUnavailable(other.to_string()),
        }
    }
}
