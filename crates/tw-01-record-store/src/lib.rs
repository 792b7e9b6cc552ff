//! # Record Store Subsystem
//!
//! **Subsystem ID:** 1
//!
//! ## Purpose
//!
//! Durable table of tree submissions. Owns the lifecycle fields
//! (`is_flagged`, `flagged_by`, `flagged_at`, `flag_reason`, `is_deleted`)
//! but never decides transitions itself: lifecycle mutations arrive from the
//! Moderation Engine as fully-formed records committed with optimistic
//! versioning.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Unflagged records carry no flag metadata | `domain/entities.rs` - `TreeRecord::flag_fields_consistent()` checked in `commit()` |
//! | INVARIANT-2 | No hard deletes | `service.rs` - no delete path exists |
//! | INVARIANT-3 | No lost updates | `service.rs` - `commit()` conditioned on the previously read bytes |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adapters/serializer.rs - bincode record codec                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ implements ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/inbound.rs  - RecordStoreApi trait                       │
//! │  shared_types::KeyValueStore - storage port                     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↑ uses ↑
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  domain/entities.rs     - TreeRecord, NewTree, Lifecycle        │
//! │  domain/value_objects.rs - RecordFilter, RecordSummary, config  │
//! │  domain/keys.rs         - key layout                            │
//! │  domain/errors.rs       - RecordStoreError                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use shared_types::{InMemoryKVStore, PrincipalId, SystemTimeSource};
//! use tw_01_record_store::{NewTree, RecordFilter, RecordStoreConfig, RecordStoreService};
//!
//! let store = RecordStoreService::new(InMemoryKVStore::new(), SystemTimeSource, RecordStoreConfig::default());
//! let record = store.create(PrincipalId(7), NewTree::new("Red Maple", 38.03, -78.47))?;
//! let active = store.list(&RecordFilter::AllActive)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{Lifecycle, LifecycleFields, NewTree, TreeRecord};
pub use domain::errors::RecordStoreError;
pub use domain::value_objects::{RecordFilter, RecordStoreConfig, RecordSummary};
pub use ports::inbound::RecordStoreApi;
pub use service::{RecordSnapshot, RecordStoreService};
