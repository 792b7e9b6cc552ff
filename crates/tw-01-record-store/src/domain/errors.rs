//! Record Store error types.

use shared_types::{KVStoreError, RecordId};
use thiserror::Error;

/// Errors that can occur during record storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordStoreError {
    /// No record with this id.
    #[error("Tree record not found: {0}")]
    NotFound(RecordId),

    /// Submission input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The record changed between read and commit.
    #[error("Concurrent modification of record {0}")]
    Conflict(RecordId),

    /// A commit would break the flag-field invariant.
    #[error("Record {0} has flag metadata while unflagged")]
    InconsistentFlagFields(RecordId),

    /// A commit tried to take a record out of the deleted state.
    #[error("Record {0} is deleted and cannot be restored")]
    Undelete(RecordId),

    /// Durable storage failed or timed out.
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),

    /// A stored record could not be decoded.
    #[error("Corrupt record data: {0}")]
    Corrupted(String),
}

impl RecordStoreError {
    /// Map a storage error for an operation on `id`.
    pub fn from_kv(id: RecordId, err: KVStoreError) -> Self {
        match err {
            KVStoreError::Conflict { .. } => Self::Conflict(id),
            KVStoreError::IOError { message } => Self::StoreUnavailable(message),
            KVStoreError::Serialization { message } => Self::Corrupted(message),
        }
    }
}

impl From<KVStoreError> for RecordStoreError {
    fn from(err: KVStoreError) -> Self {
        match err {
            KVStoreError::IOError { message } => Self::StoreUnavailable(message),
            KVStoreError::Serialization { message } => Self::Corrupted(message),
            KVStoreError::Conflict { key } => {
                Self::StoreUnavailable(format!("unexpected write conflict on {key:02x?}"))
            }
        }
    }
}
