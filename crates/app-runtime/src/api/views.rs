//! Serializable views returned by the facade.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared_types::{NotificationId, PrincipalId, RecordId, Timestamp};
use tw_01_record_store::TreeRecord;
use tw_03_notifications::{NotificationEvent, NotificationKind};

fn to_datetime(ms: Timestamp) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or_default()
}

/// A non-deleted submission as shown on the map and in listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubmissionView {
    pub id: RecordId,
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
    pub description: String,
    pub image: Option<String>,
    pub is_flagged: bool,
    pub submitted_by: PrincipalId,
    pub submitted_at: DateTime<Utc>,
}

impl From<&TreeRecord> for SubmissionView {
    fn from(record: &TreeRecord) -> Self {
        Self {
            id: record.id,
            species: record.species.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            height: record.height,
            diameter: record.diameter,
            description: record.description.clone(),
            image: record.image.clone(),
            is_flagged: record.is_flagged,
            submitted_by: record.owner,
            submitted_at: to_datetime(record.submitted_at),
        }
    }
}

/// An entry of the moderation queue.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlaggedView {
    pub id: RecordId,
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
    pub submitted_by: PrincipalId,
    pub flagged_by: Option<PrincipalId>,
    pub flagged_at: Option<DateTime<Utc>>,
    pub flag_reason: String,
}

impl From<&TreeRecord> for FlaggedView {
    fn from(record: &TreeRecord) -> Self {
        Self {
            id: record.id,
            species: record.species.clone(),
            latitude: record.latitude,
            longitude: record.longitude,
            description: record.description.clone(),
            submitted_by: record.owner,
            flagged_by: record.flagged_by,
            flagged_at: record.flagged_at.map(to_datetime),
            flag_reason: record.flag_reason.clone(),
        }
    }
}

/// A notification as shown in the recipient's inbox.
///
/// `subject` is `None` when the record it refers to no longer exists.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationView {
    pub id: NotificationId,
    pub kind: NotificationKind,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub sender: Option<PrincipalId>,
    pub subject: Option<RecordId>,
}

impl NotificationView {
    pub fn new(event: &NotificationEvent, subject_exists: bool) -> Self {
        Self {
            id: event.id,
            kind: event.kind,
            message: event.message.clone(),
            is_read: event.is_read,
            created_at: to_datetime(event.created_at),
            sender: event.sender,
            subject: subject_exists.then_some(event.subject),
        }
    }
}
