//! # Treewatch Application Runtime
//!
//! Wires the subsystems together and exposes the boundary facade used by
//! the presentation layer. The `treewatch` binary is the main entry point.
//!
//! ## Modules
//!
//! - `container/` - configuration and the service container
//! - `adapters/` - storage backends (RocksDB behind the `rocksdb` feature)
//! - `api/` - `TreewatchApp`, the async facade with serializable views
//! - `handlers/` - post-commit event consumers

pub mod adapters;
pub mod api;
pub mod container;
pub mod handlers;

pub use api::{ApiError, FlaggedView, NotificationView, SubmissionView, TreewatchApp};
pub use container::{load_config, AppConfig, ServiceContainer, StartupError};
