//! Core domain entities for the Record Store subsystem.

use serde::{Deserialize, Serialize};
use shared_types::{PrincipalId, RecordId, Timestamp};

/// Derived lifecycle state of a record.
///
/// ```text
/// [ACTIVE] ──flag──→ [FLAGGED] ──unflag──→ [ACTIVE]
///    │                   │
///    └──────delete───────┴──────────────→ [DELETED] (terminal)
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    Active,
    Flagged,
    Deleted,
}

/// Input for a new submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NewTree {
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Height in feet.
    pub height: Option<f64>,
    /// Trunk diameter in inches.
    pub diameter: Option<f64>,
    pub description: String,
    /// Reference to an uploaded image (object storage key or URL).
    pub image: Option<String>,
}

impl NewTree {
    /// Minimal submission: species and coordinates.
    pub fn new(species: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            species: species.into(),
            latitude,
            longitude,
            height: None,
            diameter: None,
            description: String::new(),
            image: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_measurements(mut self, height: Option<f64>, diameter: Option<f64>) -> Self {
        self.height = height;
        self.diameter = diameter;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// A tree submission.
///
/// INVARIANT-1: `is_flagged == false` implies `flagged_by`, `flagged_at` are
/// `None` and `flag_reason` is empty.
/// `is_deleted == true` is terminal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TreeRecord {
    pub id: RecordId,
    /// Submitting principal.
    pub owner: PrincipalId,
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
    pub description: String,
    pub image: Option<String>,
    pub submitted_at: Timestamp,
    pub is_flagged: bool,
    pub flagged_by: Option<PrincipalId>,
    pub flagged_at: Option<Timestamp>,
    pub flag_reason: String,
    /// Soft delete marker.
    pub is_deleted: bool,
    /// Bumped on every committed change.
    pub version: u64,
}

/// Snapshot of the lifecycle fields, used to compare states across transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleFields {
    pub is_flagged: bool,
    pub flagged_by: Option<PrincipalId>,
    pub flagged_at: Option<Timestamp>,
    pub flag_reason: String,
    pub is_deleted: bool,
}

impl TreeRecord {
    /// Build a fresh, active record from submission input.
    pub fn from_submission(
        id: RecordId,
        owner: PrincipalId,
        input: NewTree,
        submitted_at: Timestamp,
    ) -> Self {
        Self {
            id,
            owner,
            species: input.species.trim().to_string(),
            latitude: input.latitude,
            longitude: input.longitude,
            height: input.height,
            diameter: input.diameter,
            description: input.description,
            image: input.image,
            submitted_at,
            is_flagged: false,
            flagged_by: None,
            flagged_at: None,
            flag_reason: String::new(),
            is_deleted: false,
            version: 0,
        }
    }

    /// Current lifecycle state. Deletion dominates the flag fields.
    pub fn lifecycle(&self) -> Lifecycle {
        if self.is_deleted {
            Lifecycle::Deleted
        } else if self.is_flagged {
            Lifecycle::Flagged
        } else {
            Lifecycle::Active
        }
    }

    pub fn is_owned_by(&self, principal: PrincipalId) -> bool {
        self.owner == principal
    }

    /// INVARIANT-1 check.
    pub fn flag_fields_consistent(&self) -> bool {
        self.is_flagged
            || (self.flagged_by.is_none() && self.flagged_at.is_none() && self.flag_reason.is_empty())
    }

    pub fn lifecycle_fields(&self) -> LifecycleFields {
        LifecycleFields {
            is_flagged: self.is_flagged,
            flagged_by: self.flagged_by,
            flagged_at: self.flagged_at,
            flag_reason: self.flag_reason.clone(),
            is_deleted: self.is_deleted,
        }
    }
}
