//! # Record Store Service
//!
//! Implements `RecordStoreApi` over the shared `KeyValueStore`.
//!
//! Every write is a `compare_and_batch_write` conditioned on the bytes read
//! beforehand, so two writers racing on one record can never both commit.

use crate::adapters::serializer::{decode_record, encode_record};
use crate::domain::entities::{NewTree, TreeRecord};
use crate::domain::errors::RecordStoreError;
use crate::domain::keys::{record_key, TREE_PREFIX};
use crate::domain::value_objects::{RecordFilter, RecordStoreConfig, RecordSummary};
use crate::ports::inbound::RecordStoreApi;
use shared_types::{
    BatchOperation, KeyValueStore, Precondition, PrincipalId, RecordId, TimeSource,
};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// A record as read, plus the exact committed bytes.
///
/// Passed back to `commit()` as the optimistic-concurrency token.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordSnapshot {
    pub record: TreeRecord,
    pub(crate) raw: Vec<u8>,
}

/// The Record Store Service.
pub struct RecordStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    kv_store: KV,
    time_source: TS,
    config: RecordStoreConfig,
}

impl<KV, TS> RecordStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    pub fn new(kv_store: KV, time_source: TS, config: RecordStoreConfig) -> Self {
        Self {
            kv_store,
            time_source,
            config,
        }
    }

    pub fn config(&self) -> &RecordStoreConfig {
        &self.config
    }

    fn scan(&self) -> Result<Vec<TreeRecord>, RecordStoreError> {
        self.kv_store
            .prefix_scan(TREE_PREFIX)?
            .into_iter()
            .map(|(_, value)| decode_record(&value))
            .collect()
    }
}

impl<KV, TS> RecordStoreApi for RecordStoreService<KV, TS>
where
    KV: KeyValueStore,
    TS: TimeSource,
{
    fn create(&self, owner: PrincipalId, input: NewTree) -> Result<TreeRecord, RecordStoreError> {
        self.config.validate_submission(&input)?;

        let id = RecordId::new();
        let record = TreeRecord::from_submission(id, owner, input, self.time_source.now());
        let key = record_key(&id);
        let bytes = encode_record(&record)?;

        self.kv_store
            .compare_and_batch_write(
                &[Precondition::absent(key.clone())],
                vec![BatchOperation::put(key, bytes)],
            )
            .map_err(|e| RecordStoreError::from_kv(id, e))?;

        debug!(record = %id, owner = %owner, species = %record.species, "tree record created");
        Ok(record)
    }

    fn get(&self, id: RecordId) -> Result<TreeRecord, RecordStoreError> {
        self.snapshot(id).map(|s| s.record)
    }

    fn exists(&self, id: RecordId) -> Result<bool, RecordStoreError> {
        Ok(self.kv_store.exists(&record_key(&id))?)
    }

    fn list(&self, filter: &RecordFilter) -> Result<Vec<TreeRecord>, RecordStoreError> {
        let mut records: Vec<TreeRecord> = self
            .scan()?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect();
        records.sort_by(|a, b| (a.submitted_at, a.id).cmp(&(b.submitted_at, b.id)));
        Ok(records)
    }

    fn update(
        &self,
        id: RecordId,
        mutator: &mut dyn FnMut(&mut TreeRecord),
    ) -> Result<TreeRecord, RecordStoreError> {
        for attempt in 1..=self.config.max_commit_attempts {
            let snapshot = self.snapshot(id)?;
            let mut next = snapshot.record.clone();
            mutator(&mut next);
            next.id = snapshot.record.id;
            next.owner = snapshot.record.owner;
            next.submitted_at = snapshot.record.submitted_at;

            match self.commit(&snapshot, next, Vec::new()) {
                Err(RecordStoreError::Conflict(_)) => {
                    warn!(record = %id, attempt, "record update conflicted, retrying");
                }
                other => return other,
            }
        }
        Err(RecordStoreError::StoreUnavailable(format!(
            "record {id} stayed contended after {} attempts",
            self.config.max_commit_attempts
        )))
    }

    fn snapshot(&self, id: RecordId) -> Result<RecordSnapshot, RecordStoreError> {
        let raw = self
            .kv_store
            .get(&record_key(&id))?
            .ok_or(RecordStoreError::NotFound(id))?;
        let record = decode_record(&raw)?;
        Ok(RecordSnapshot { record, raw })
    }

    fn commit(
        &self,
        snapshot: &RecordSnapshot,
        mut next: TreeRecord,
        extra_ops: Vec<BatchOperation>,
    ) -> Result<TreeRecord, RecordStoreError> {
        let id = snapshot.record.id;
        if next.id != id {
            return Err(RecordStoreError::InvalidInput(format!(
                "commit for {id} carries record {}",
                next.id
            )));
        }
        if !next.flag_fields_consistent() {
            return Err(RecordStoreError::InconsistentFlagFields(id));
        }
        if snapshot.record.is_deleted && !next.is_deleted {
            return Err(RecordStoreError::Undelete(id));
        }

        next.version = snapshot.record.version + 1;
        let key = record_key(&id);
        let bytes = encode_record(&next)?;

        let mut ops = Vec::with_capacity(extra_ops.len() + 1);
        ops.push(BatchOperation::put(key.clone(), bytes));
        ops.extend(extra_ops);

        self.kv_store
            .compare_and_batch_write(&[Precondition::unchanged(key, snapshot.raw.clone())], ops)
            .map_err(|e| RecordStoreError::from_kv(id, e))?;

        Ok(next)
    }

    fn species(&self) -> Result<Vec<String>, RecordStoreError> {
        let species: BTreeSet<String> = self
            .scan()?
            .into_iter()
            .filter(|r| !r.is_deleted)
            .map(|r| r.species)
            .collect();
        Ok(species.into_iter().collect())
    }

    fn summary(&self) -> Result<RecordSummary, RecordStoreError> {
        let mut summary = RecordSummary::default();
        for record in self.scan()? {
            summary.count(&record);
        }
        Ok(summary)
    }
}
