//! # Notification Dispatcher Subsystem
//!
//! **Subsystem ID:** 3
//!
//! ## Purpose
//!
//! Persists one notification entry per recipient for every moderation
//! transition and serves the pull-polled read/unread queries and bulk
//! mutations issued by recipients.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | Only the recipient changes read state | `service.rs` - `mark_read()`, `mark_all_read()` |
//! | INVARIANT-2 | Bulk delete never touches foreign entries | `service.rs` - `delete()` filters by recipient |
//! | INVARIANT-3 | Message text is fixed at creation | `domain/entities.rs` - no mutator for `message` |
//!
//! ## Storage Layout
//!
//! ```text
//! notif:<uuid>                  → bincode NotificationEvent
//! inbox:<recipient BE><uuid>    → (empty) secondary index for per-recipient scans
//! ```
//!
//! Both keys are written in the same batch. `stage()` hands that batch to the
//! Moderation Engine so the record change and its notification commit together.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{NotificationEvent, NotificationKind};
pub use domain::errors::NotificationError;
pub use domain::messages::render_message;
pub use domain::value_objects::{DispatcherConfig, StagedNotification};
pub use ports::inbound::NotificationApi;
pub use service::NotificationDispatcher;
