//! # RocksDB Storage Adapter
//!
//! Production RocksDB implementation of the `KeyValueStore` port.
//!
//! ## Features
//!
//! - Atomic batch writes (`WriteBatch`)
//! - Conditional batches: preconditions are checked and the batch written
//!   while holding the store's write lock, so no other writer in this
//!   process can interleave
//! - Snappy compression, bloom filters
//!
//! The database is opened by one process at a time (RocksDB's own LOCK
//! file), so the in-process write lock is sufficient for compare-and-write.

use parking_lot::RwLock;
use rocksdb::{IteratorMode, Options, WriteBatch, WriteOptions, DB};
use shared_types::{BatchOperation, KVStoreError, KeyValueStore, Precondition, ScanResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// RocksDB configuration.
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: PathBuf,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 16MB)
    pub write_buffer_size: usize,
    /// Enable fsync after each write (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./data/rocksdb"),
            block_cache_size: 64 * 1024 * 1024,
            write_buffer_size: 16 * 1024 * 1024,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,
            write_buffer_size: 4 * 1024 * 1024,
            sync_writes: false,
        }
    }
}

/// RocksDB-backed key-value store implementing the KeyValueStore trait
pub struct RocksDbStore {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
}

fn io_error(what: &str, e: rocksdb::Error) -> KVStoreError {
    KVStoreError::io(format!("RocksDB {what} failed: {e}"))
}

impl RocksDbStore {
    /// Open or create a RocksDB database
    pub fn open(config: RocksDbConfig) -> Result<Self, KVStoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        // Bloom filter for faster lookups
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let db = DB::open(&opts, &config.path)
            .map_err(|e| KVStoreError::io(format!("Failed to open RocksDB: {e}")))?;

        debug!(path = ?config.path, "RocksDB opened");
        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
        })
    }

    /// Open with default tuning at `path`.
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, KVStoreError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_path_buf(),
            ..Default::default()
        })
    }

    fn write_options(&self) -> WriteOptions {
        let mut write_opts = WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        write_opts
    }

    fn to_batch(operations: Vec<BatchOperation>) -> WriteBatch {
        let mut batch = WriteBatch::default();
        for op in operations {
            match op {
                BatchOperation::Put { key, value } => batch.put(&key, &value),
                BatchOperation::Delete { key } => batch.delete(&key),
            }
        }
        batch
    }
}

impl KeyValueStore for RocksDbStore {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, KVStoreError> {
        let db = self.db.read();
        db.get(key).map_err(|e| io_error("get", e))
    }

    fn put(&self, key: &[u8], value: &[u8]) -> Result<(), KVStoreError> {
        let db = self.db.write();
        db.put_opt(key, value, &self.write_options())
            .map_err(|e| io_error("put", e))
    }

    fn delete(&self, key: &[u8]) -> Result<(), KVStoreError> {
        let db = self.db.write();
        db.delete_opt(key, &self.write_options())
            .map_err(|e| io_error("delete", e))
    }

    fn atomic_batch_write(&self, operations: Vec<BatchOperation>) -> Result<(), KVStoreError> {
        let db = self.db.write();
        db.write_opt(Self::to_batch(operations), &self.write_options())
            .map_err(|e| io_error("batch write", e))
    }

    fn compare_and_batch_write(
        &self,
        preconditions: &[Precondition],
        operations: Vec<BatchOperation>,
    ) -> Result<(), KVStoreError> {
        let db = self.db.write();
        for precondition in preconditions {
            let committed = db
                .get_pinned(&precondition.key)
                .map_err(|e| io_error("precondition read", e))?;
            if !precondition.holds(committed.as_deref()) {
                return Err(KVStoreError::Conflict {
                    key: precondition.key.clone(),
                });
            }
        }
        db.write_opt(Self::to_batch(operations), &self.write_options())
            .map_err(|e| io_error("conditional batch write", e))
    }

    fn exists(&self, key: &[u8]) -> Result<bool, KVStoreError> {
        let db = self.db.read();
        db.get_pinned(key)
            .map(|v| v.is_some())
            .map_err(|e| io_error("exists check", e))
    }

    fn prefix_scan(&self, prefix: &[u8]) -> Result<ScanResult, KVStoreError> {
        let db = self.db.read();
        let mut results = Vec::new();

        let iter = db.iterator(IteratorMode::From(prefix, rocksdb::Direction::Forward));

        for item in iter {
            let (key, value) = item.map_err(|e| io_error("scan", e))?;
            if !key.starts_with(prefix) {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }

        Ok(results)
    }
}
