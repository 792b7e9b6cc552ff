//! # Moderation Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Holds the Authorization Guard (a pure decision function) and the
//! Moderation Engine that applies allowed transitions to tree records and
//! emits exactly one notification per flag, unflag or delete.
//!
//! ## State Machine
//!
//! ```text
//! [ACTIVE] ──flag──→ [FLAGGED] ──unflag──→ [ACTIVE]
//!    │                   │
//!    └──────delete───────┴──────────────→ [DELETED] (terminal)
//!
//! edit: moderator-only, changes species/description, no state change, no event
//! ```
//!
//! ## Commit Protocol
//!
//! ```text
//! snapshot(record) → authorize → apply transition → stage notification
//!        ↑                                                  │
//!        └─────── Conflict: re-read, re-authorize ←── commit(record + notification)
//! ```
//!
//! The record and its notification are written in one conditional batch,
//! so a reader never sees one without the other. The Record Store and the
//! Notification Dispatcher handed to the engine must share one
//! `KeyValueStore`.
//!
//! ## Error Order
//!
//! `InvalidInput` (checked before any read) → `NotFound` → `Forbidden(reason)`.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::ModerationError;
pub use domain::guard::{authorize, authorize_named, Action, Decision};
pub use domain::value_objects::{EditRequest, ModerationConfig, TransitionOutcome};
pub use ports::inbound::ModerationApi;
pub use service::ModerationEngine;
