//! Key layout in the shared key-value store.

use shared_types::{NotificationId, PrincipalId};
use std::convert::TryInto;

pub const NOTIF_PREFIX: &[u8] = b"notif:";
pub const INBOX_PREFIX: &[u8] = b"inbox:";

pub fn notification_key(id: &NotificationId) -> Vec<u8> {
    let mut key = Vec::with_capacity(NOTIF_PREFIX.len() + 16);
    key.extend_from_slice(NOTIF_PREFIX);
    key.extend_from_slice(id.as_bytes());
    key
}

/// Prefix shared by every inbox entry of `recipient`.
pub fn inbox_prefix(recipient: PrincipalId) -> Vec<u8> {
    let mut key = Vec::with_capacity(INBOX_PREFIX.len() + 8);
    key.extend_from_slice(INBOX_PREFIX);
    key.extend_from_slice(&recipient.to_be_bytes());
    key
}

pub fn inbox_key(recipient: PrincipalId, id: &NotificationId) -> Vec<u8> {
    let mut key = inbox_prefix(recipient);
    key.extend_from_slice(id.as_bytes());
    key
}

/// Extract the notification id from an inbox key.
pub fn id_from_inbox_key(key: &[u8]) -> Option<NotificationId> {
    let start = INBOX_PREFIX.len() + 8;
    let bytes: [u8; 16] = key.get(start..start + 16)?.try_into().ok()?;
    Some(NotificationId::from_bytes(bytes))
}
