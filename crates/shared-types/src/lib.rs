//! # Shared Types Crate
//!
//! This crate contains the identifiers, the principal model and the storage
//! port shared by the Treewatch subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Explicit Principals**: Every operation receives the acting `Principal`;
//!   there is no ambient "current user".
//! - **One Storage Port**: Record Store and Notification Dispatcher persist
//!   through the same `KeyValueStore`, so a transition and its notification
//!   commit in a single atomic batch.

pub mod entities;
pub mod errors;
pub mod storage;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use storage::{BatchOperation, InMemoryKVStore, KeyValueStore, Precondition, ScanResult};
pub use time::{MockTimeSource, SystemTimeSource, TimeSource, Timestamp};
