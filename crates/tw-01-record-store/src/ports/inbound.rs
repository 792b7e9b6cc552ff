//! # Inbound Ports (Driving Ports)
//!
//! The primary API for the Record Store subsystem.

use crate::domain::entities::{NewTree, TreeRecord};
use crate::domain::errors::RecordStoreError;
use crate::domain::value_objects::{RecordFilter, RecordSummary};
use crate::service::RecordSnapshot;
use shared_types::{BatchOperation, PrincipalId, RecordId};

/// Primary API for the Record Store subsystem.
///
/// Implementations must enforce all domain invariants.
pub trait RecordStoreApi: Send + Sync {
    /// Validate and persist a new active record owned by `owner`.
    ///
    /// ## Errors
    ///
    /// - `InvalidInput`: species missing or too long, coordinates out of range,
    ///   non-positive measurements
    /// - `StoreUnavailable`: storage I/O failed
    fn create(&self, owner: PrincipalId, input: NewTree) -> Result<TreeRecord, RecordStoreError>;

    /// Read a record by id. Deleted records are still returned.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no record with this id
    fn get(&self, id: RecordId) -> Result<TreeRecord, RecordStoreError>;

    /// Check whether a record with this id exists.
    fn exists(&self, id: RecordId) -> Result<bool, RecordStoreError>;

    /// List records matching `filter`, ordered by submission time then id.
    fn list(&self, filter: &RecordFilter) -> Result<Vec<TreeRecord>, RecordStoreError>;

    /// Apply `mutator` to the committed record atomically.
    ///
    /// The mutator runs against a fresh read on every attempt; identity
    /// fields (`id`, `owner`, `submitted_at`) cannot be changed.
    ///
    /// ## Errors
    ///
    /// - `NotFound`: no record with this id
    /// - `InconsistentFlagFields` / `Undelete`: the mutation breaks a record invariant
    /// - `StoreUnavailable`: storage failed or the record stayed contended
    fn update(
        &self,
        id: RecordId,
        mutator: &mut dyn FnMut(&mut TreeRecord),
    ) -> Result<TreeRecord, RecordStoreError>;

    /// Read a record together with the committed bytes it was decoded from.
    fn snapshot(&self, id: RecordId) -> Result<RecordSnapshot, RecordStoreError>;

    /// Commit `next` in place of `snapshot`, together with `extra_ops`, as one
    /// atomic batch conditioned on the record being unchanged since the snapshot.
    ///
    /// ## Errors
    ///
    /// - `Conflict`: the record changed since the snapshot; nothing was written
    fn commit(
        &self,
        snapshot: &RecordSnapshot,
        next: TreeRecord,
        extra_ops: Vec<BatchOperation>,
    ) -> Result<TreeRecord, RecordStoreError>;

    /// Sorted, de-duplicated species of non-deleted records.
    fn species(&self) -> Result<Vec<String>, RecordStoreError>;

    /// Status breakdown over every stored record.
    fn summary(&self) -> Result<RecordSummary, RecordStoreError>;
}

impl<T: RecordStoreApi + ?Sized> RecordStoreApi for std::sync::Arc<T> {
    fn create(&self, owner: PrincipalId, input: NewTree) -> Result<TreeRecord, RecordStoreError> {
        (**self).create(owner, input)
    }

    fn get(&self, id: RecordId) -> Result<TreeRecord, RecordStoreError> {
        (**self).get(id)
    }

    fn exists(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        (**self).exists(id)
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<TreeRecord>, RecordStoreError> {
        (**self).list(filter)
    }

    fn update(
        &self,
        id: RecordId,
        mutator: &mut dyn FnMut(&mut TreeRecord),
    ) -> Result<TreeRecord, RecordStoreError> {
        (**self).update(id, mutator)
    }

    fn snapshot(&self, id: RecordId) -> Result<RecordSnapshot, RecordStoreError> {
        (**self).snapshot(id)
    }

    fn commit(
        &self,
        snapshot: &RecordSnapshot,
        next: TreeRecord,
        extra_ops: Vec<BatchOperation>,
    ) -> Result<TreeRecord, RecordStoreError> {
        (**self).commit(snapshot, next, extra_ops)
    }

    fn species(&self) -> Result<Vec<String>, RecordStoreError> {
        (**self).species()
    }

    fn summary(&self) -> Result<RecordSummary, RecordStoreError> {
        (**self).summary()
    }
}
