//! Key layout in the shared key-value store.
//!
//! `tree:<16-byte record uuid>` → bincode `TreeRecord`

use shared_types::RecordId;

/// Prefix for all tree records.
pub const TREE_PREFIX: &[u8] = b"tree:";

/// Primary key of a record.
pub fn record_key(id: &RecordId) -> Vec<u8> {
    let mut key = Vec::with_capacity(TREE_PREFIX.len() + 16);
    key.extend_from_slice(TREE_PREFIX);
    key.extend_from_slice(id.as_bytes());
    key
}
