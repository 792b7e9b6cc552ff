use super::errors::ModerationError;
use serde::{Deserialize, Serialize};
use tw_01_record_store::TreeRecord;
use tw_03_notifications::NotificationEvent;

/// Moderation Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModerationConfig {
    /// Maximum flag reason length in characters.
    pub max_reason_len: usize,
    pub max_species_len: usize,
    pub max_description_len: usize,
    /// Re-read/re-authorize cycles on write conflicts before giving up.
    pub max_commit_attempts: u32,
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            max_reason_len: 500,
            max_species_len: 100,
            max_description_len: 2000,
            max_commit_attempts: 5,
        }
    }
}

impl ModerationConfig {
    pub fn validate_reason(&self, reason: &str) -> Result<(), ModerationError> {
        if reason.trim().chars().count() > self.max_reason_len {
            return Err(ModerationError::InvalidInput(format!(
                "reason exceeds {} characters",
                self.max_reason_len
            )));
        }
        Ok(())
    }

    pub fn validate_edit(&self, request: &EditRequest) -> Result<(), ModerationError> {
        if request.species.is_none() && request.description.is_none() {
            return Err(ModerationError::InvalidInput(
                "edit must change species or description".to_string(),
            ));
        }
        if let Some(species) = &request.species {
            let species = species.trim();
            if species.is_empty() {
                return Err(ModerationError::InvalidInput("species is required".to_string()));
            }
            if species.chars().count() > self.max_species_len {
                return Err(ModerationError::InvalidInput(format!(
                    "species exceeds {} characters",
                    self.max_species_len
                )));
            }
        }
        if let Some(description) = &request.description {
            if description.chars().count() > self.max_description_len {
                return Err(ModerationError::InvalidInput(format!(
                    "description exceeds {} characters",
                    self.max_description_len
                )));
            }
        }
        Ok(())
    }
}

/// Fields a moderator may overwrite. `None` leaves the field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRequest {
    pub species: Option<String>,
    pub description: Option<String>,
}

/// Result of a committed transition.
#[derive(Clone, Debug, PartialEq)]
pub struct TransitionOutcome {
    /// The record as committed.
    pub record: TreeRecord,
    /// Present for flag, unflag and delete.
    pub notification: Option<NotificationEvent>,
}
