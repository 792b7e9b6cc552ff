//! bincode codec for stored notification entries.

use crate::domain::entities::NotificationEvent;
use crate::domain::errors::NotificationError;

pub fn encode_event(event: &NotificationEvent) -> Result<Vec<u8>, NotificationError> {
    bincode::serialize(event).map_err(|e| NotificationError::Corrupted(e.to_string()))
}

pub fn decode_event(data: &[u8]) -> Result<NotificationEvent, NotificationError> {
    bincode::deserialize(data).map_err(|e| NotificationError::Corrupted(e.to_string()))
}
