use crate::domain::entities::TreeRecord;
use crate::domain::errors::RecordStoreError;

/// Encode a record with bincode.
pub fn encode_record(record: &TreeRecord) -> Result<Vec<u8>, RecordStoreError> {
    bincode::serialize(record).map_err(|e| RecordStoreError::Corrupted(e.to_string()))
}

/// Decode a record with bincode.
pub fn decode_record(data: &[u8]) -> Result<TreeRecord, RecordStoreError> {
    bincode::deserialize(data).map_err(|e| RecordStoreError::Corrupted(e.to_string()))
}
