//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (API exposed to the Moderation Engine and the facade)
//!
//! The driven side is `shared_types::KeyValueStore`, shared with the
//! Notification Dispatcher.

pub mod inbound;
