//! # Storage Port (Driven Port)
//!
//! Abstract key-value interface shared by the Record Store and the
//! Notification Dispatcher.
//!
//! Production: `RocksDbStore` (app-runtime/adapters/storage/rocksdb_adapter.rs)
//! Testing: `InMemoryKVStore` (below)
//!
//! ## Atomicity
//!
//! `compare_and_batch_write` is the only write path used by lifecycle
//! transitions: the batch is applied only if every precondition still matches
//! the committed value, otherwise nothing is written and `Conflict` is
//! returned. Callers re-read and re-validate on conflict.

use crate::errors::KVStoreError;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Key/value pairs returned by a prefix scan, in key order.
pub type ScanResult = Vec<(Vec<u8>, Vec<u8>)>;

/// Abstract interface for key-value database operations.
pub trait KeyValueStore: Send + Sync {
    /// Get a value by key.
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError>;

    /// Put a single key-value pair.
    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError>;

    /// Delete a key.
    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write.
    ///
    /// Either ALL operations in the batch succeed, or NONE are applied.
    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError>;

    /// Execute an atomic batch write conditioned on the committed state.
    ///
    /// Returns `KVStoreError::Conflict` without applying anything if any
    /// precondition fails.
    fn compare_and_batch_write(
        &self,
        preconditions: &[Precondition],
        operations: Vec<BatchOperation>,
    ) -> Result<(), KVStoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError>;

    /// Iterate over keys with a prefix, in key order.
    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        (**self).put(key, value)
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        (**self).delete(key)
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        (**self).atomic_batch_write(operations)
    }

    fn compare_and_batch_write(
        &self,
        preconditions: &[Precondition],
        operations: Vec<BatchOperation>,
    ) -> Result<(), KVStoreError> {
        (**self).compare_and_batch_write(preconditions, operations)
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        (**self).exists(key)
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        (**self).prefix_scan(prefix)
    }
}

/// Batch operation for atomic writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put a key-value pair.
    Put { key: Vec<u8>, value: Vec<u8> },
    /// Delete a key.
    Delete { key: Vec<u8> },
}

impl BatchOperation {
    /// Create a Put operation.
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Create a Delete operation.
    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        BatchOperation::Delete { key: key.into() }
    }
}

/// Expected committed value of a key at write time.
///
/// `expected: None` means the key must be absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Precondition {
    pub key: Vec<u8>,
    pub expected: Option<Vec<u8>>,
}

impl Precondition {
    /// Require `key` to still hold `value`.
    pub fn unchanged(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            expected: Some(value.into()),
        }
    }

    /// Require `key` to be absent.
    pub fn absent(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            expected: None,
        }
    }

    /// Check this precondition against a committed value.
    pub fn holds(&self, committed: Option<&[u8]>) -> bool {
        self.expected.as_deref() == committed
    }
}

/// In-memory key-value store.
///
/// Backed by an ordered map so prefix scans match RocksDB ordering.
/// All writes take the single write lock, which makes the
/// check-then-apply of `compare_and_batch_write` atomic.
#[derive(Debug, Default)]
pub struct InMemoryKVStore {
    data: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryKVStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

fn apply(data: &mut BTreeMap<Vec<u8>, Vec<u8>>, operations: Vec<BatchOperation>) {
    for op in operations {
        match op {
            BatchOperation::Put { key, value } => {
                data.insert(key, value);
            }
            BatchOperation::Delete { key } => {
                data.remove(&key);
            }
        }
    }
}

impl KeyValueStore for InMemoryKVStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        Ok(self.data.read().get(key).cloned())
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        self.data.write().insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        self.data.write().remove(key);
        Ok(())
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        apply(&mut self.data.write(), operations);
        Ok(())
    }

    fn compare_and_batch_write(
        &self,
        preconditions: &[Precondition],
        operations: Vec<BatchOperation>,
    ) -> Result<(), KVStoreError> {
        let mut data = self.data.write();
        if let Some(failed) = preconditions
            .iter()
            .find(|p| !p.holds(data.get(&p.key).map(Vec::as_slice)))
        {
            return Err(KVStoreError::Conflict {
                key: failed.key.clone(),
            });
        }
        apply(&mut data, operations);
        Ok(())
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        Ok(self.data.read().contains_key(key))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        let data = self.data.read();
        let results = data
            .range(prefix.to_vec()..)
            .take_while(|(k, _)| k.starts_with(prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Ok(results)
    }
}
