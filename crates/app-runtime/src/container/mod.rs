//! # Service Container
//!
//! Holds the subsystem instances wired to one shared storage backend.
//!
//! - Record Store and Notification Dispatcher persist through the same
//!   `KeyValueStore`, which is what lets the Moderation Engine commit a
//!   transition and its notification in one batch
//! - The event bus carries post-commit notices only; no subsystem depends
//!   on it for correctness

pub mod config;
pub mod services;

pub use config::{load_config, AppConfig, ConfigError, LoggingConfig, StorageBackend, StorageConfig};
pub use services::{Clock, Dispatcher, Engine, RecordStore, ServiceContainer, SharedStore, StartupError};
