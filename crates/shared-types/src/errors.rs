//! # Error Types
//!
//! Defines error types used across subsystems.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an operation was refused.
///
/// Every variant renders as a user-facing explanation; the presentation
/// layer shows it verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
    /// The record was soft deleted; it accepts no further transitions.
    #[error("This submission has been removed")]
    RecordDeleted,

    /// Principals may not flag their own submissions.
    #[error("You cannot flag your own submission")]
    OwnSubmission,

    /// The record is already flagged and awaits review.
    #[error("This submission has already been flagged for review")]
    AlreadyFlagged,

    /// Unflag requested on a record that is not flagged.
    #[error("This submission is not flagged")]
    NotFlagged,

    /// The action requires the moderator role.
    #[error("Only moderators can perform this action")]
    ModeratorOnly,

    /// Delete requested on a record that is already deleted.
    #[error("This submission has already been removed")]
    AlreadyDeleted,

    /// A notification can only be changed by its recipient.
    #[error("This notification belongs to another user")]
    NotRecipient,

    /// The action name is not part of the workflow.
    #[error("Unknown action")]
    UnknownAction,
}

/// Errors from the key-value storage port.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KVStoreError {
    /// Underlying storage I/O failed or timed out.
    #[error("Storage I/O error: {message}")]
    IOError { message: String },

    /// A precondition no longer matched the committed value.
    #[error("Write conflict on key {key:02x?}")]
    Conflict { key: Vec<u8> },

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl KVStoreError {
    /// Create an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::IOError {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization {
            message: message.to_string(),
        }
    }

    /// Returns true for optimistic-concurrency conflicts.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
