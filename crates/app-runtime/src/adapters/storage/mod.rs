//! # Production Storage Adapters
//!
//! Enable the `rocksdb` feature to use the durable backend:
//!
//! ```toml
//! app-runtime = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! Records, notifications and the inbox index share one keyspace so a
//! transition and its notification land in one `WriteBatch`.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{RocksDbConfig, RocksDbStore};

// Re-export in-memory adapter for testing and the memory backend
pub use shared_types::InMemoryKVStore;
