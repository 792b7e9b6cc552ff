//! # Shared Bus - In-Process Event Bus
//!
//! Carries post-commit `TreewatchEvent` notices from the application facade
//! to in-process consumers such as the audit log.
//!
//! ```text
//! ┌──────────────┐                    ┌──────────────┐
//! │ TreewatchApp │                    │ AuditHandler │
//! │              │    publish()       │              │
//! │              │ ──────┐            │              │
//! └──────────────┘       │            └──────────────┘
//!                        ▼                    ↑
//!                  ┌──────────────┐          │
//!                  │  Event Bus   │          │
//!                  │              │ ─────────┘
//!                  └──────────────┘  subscribe()
//! ```
//!
//! Notifications to users are NOT delivered over this bus; they are
//! persisted in the same commit as the transition that caused them.

// Nursery lints that are too strict
#![allow(clippy::missing_const_for_fn)]
// Allow in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]

pub mod events;
pub mod publisher;
pub mod subscriber;

// Re-export main types
pub use events::{EventFilter, EventTopic, TreewatchEvent};
pub use publisher::{EventPublisher, InMemoryEventBus};
pub use subscriber::Subscription;

/// Maximum events to buffer per subscriber before lagging receivers drop events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1000;
