//! # Core Domain Entities
//!
//! Identifiers and the principal model used across subsystems.
//!
//! ## Clusters
//!
//! - **Identity**: `PrincipalId`, `Role`, `Principal`
//! - **Records**: `RecordId`
//! - **Notifications**: `NotificationId`

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Stable identifier of an authenticated principal.
///
/// Issued by the external identity provider; the core never mints these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PrincipalId(pub u64);

impl PrincipalId {
    /// Big-endian bytes, used as a key component so prefix scans group by principal.
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "principal:{}", self.0)
    }
}

/// Role attribute carried by a principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Regular community member.
    #[default]
    Standard,
    /// May unflag, soft delete and edit any record.
    Moderator,
}

/// An authenticated caller as resolved by the identity/session layer.
///
/// The role is checked at authorization time and never cached on records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    /// Stable identifier.
    pub id: PrincipalId,
    /// Role at the time of the call.
    pub role: Role,
}

impl Principal {
    /// Create a principal with an explicit role.
    pub fn new(id: u64, role: Role) -> Self {
        Self {
            id: PrincipalId(id),
            role,
        }
    }

    /// Create a standard (non-moderator) principal.
    pub fn standard(id: u64) -> Self {
        Self::new(id, Role::Standard)
    }

    /// Create a moderator principal.
    pub fn moderator(id: u64) -> Self {
        Self::new(id, Role::Moderator)
    }

    /// Returns true if this principal holds the moderator role.
    pub fn is_moderator(&self) -> bool {
        self.role == Role::Moderator
    }
}

// =============================================================================
// CLUSTER B: RECORDS & NOTIFICATIONS
// =============================================================================

/// Opaque identifier of a tree submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

impl RecordId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Raw bytes for key construction.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a notification entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Raw bytes for key construction.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Rebuild an identifier from key bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_roles() {
        assert!(Principal::moderator(1).is_moderator());
        assert!(!Principal::standard(2).is_moderator());
        assert_eq!(Principal::standard(2).id, PrincipalId(2));
    }

    #[test]
    fn test_principal_key_bytes_sort_numerically() {
        assert!(PrincipalId(2).to_be_bytes() < PrincipalId(256).to_be_bytes());
    }

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
        assert_ne!(NotificationId::new(), NotificationId::new());
    }

    #[test]
    fn test_role_default_is_standard() {
        assert_eq!(Role::default(), Role::Standard);
    }
}
