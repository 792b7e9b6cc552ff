//! Value objects for the Record Store subsystem.

use super::entities::{Lifecycle, NewTree, TreeRecord};
use super::errors::RecordStoreError;
use serde::{Deserialize, Serialize};
use shared_types::PrincipalId;

/// Listing filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordFilter {
    /// Every non-deleted record (flagged ones included).
    AllActive,
    /// Non-deleted records currently flagged.
    FlaggedActive,
    /// Every record submitted by a principal, deleted ones included.
    OwnedBy(PrincipalId),
    /// Non-deleted records of one species (exact match).
    Species(String),
}

impl RecordFilter {
    /// Check if a record matches this filter.
    pub fn matches(&self, record: &TreeRecord) -> bool {
        match self {
            Self::AllActive => !record.is_deleted,
            Self::FlaggedActive => record.lifecycle() == Lifecycle::Flagged,
            Self::OwnedBy(owner) => record.owner == *owner,
            Self::Species(species) => !record.is_deleted && record.species == *species,
        }
    }
}

/// Status breakdown of the whole table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSummary {
    pub total: usize,
    /// Non-deleted, not flagged.
    pub active: usize,
    /// Non-deleted, flagged.
    pub flagged: usize,
    pub deleted: usize,
}

impl RecordSummary {
    pub fn count(&mut self, record: &TreeRecord) {
        self.total += 1;
        match record.lifecycle() {
            Lifecycle::Active => self.active += 1,
            Lifecycle::Flagged => self.flagged += 1,
            Lifecycle::Deleted => self.deleted += 1,
        }
    }
}

/// Record Store configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordStoreConfig {
    /// Maximum species name length in characters.
    pub max_species_len: usize,
    /// Maximum description length in characters.
    pub max_description_len: usize,
    /// Attempts for `update()` before giving up on a contended record.
    pub max_commit_attempts: u32,
}

impl Default for RecordStoreConfig {
    fn default() -> Self {
        Self {
            max_species_len: 100,
            max_description_len: 2000,
            max_commit_attempts: 5,
        }
    }
}

impl RecordStoreConfig {
    /// Validate a species name as it would be stored.
    pub fn validate_species(&self, species: &str) -> Result<(), RecordStoreError> {
        let species = species.trim();
        if species.is_empty() {
            return Err(RecordStoreError::InvalidInput(
                "species is required".to_string(),
            ));
        }
        if species.chars().count() > self.max_species_len {
            return Err(RecordStoreError::InvalidInput(format!(
                "species exceeds {} characters",
                self.max_species_len
            )));
        }
        Ok(())
    }

    pub fn validate_description(&self, description: &str) -> Result<(), RecordStoreError> {
        if description.chars().count() > self.max_description_len {
            return Err(RecordStoreError::InvalidInput(format!(
                "description exceeds {} characters",
                self.max_description_len
            )));
        }
        Ok(())
    }

    /// Validate a full submission.
    pub fn validate_submission(&self, input: &NewTree) -> Result<(), RecordStoreError> {
        self.validate_species(&input.species)?;
        self.validate_description(&input.description)?;

        if !input.latitude.is_finite() || !(-90.0..=90.0).contains(&input.latitude) {
            return Err(RecordStoreError::InvalidInput(format!(
                "latitude {} out of range",
                input.latitude
            )));
        }
        if !input.longitude.is_finite() || !(-180.0..=180.0).contains(&input.longitude) {
            return Err(RecordStoreError::InvalidInput(format!(
                "longitude {} out of range",
                input.longitude
            )));
        }
        for (name, value) in [("height", input.height), ("diameter", input.diameter)] {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(RecordStoreError::InvalidInput(format!(
                        "{name} must be a positive number"
                    )));
                }
            }
        }
        Ok(())
    }
}
