//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (moderation operations)
//!
//! Driven dependencies are the inbound ports of the Record Store
//! (`RecordStoreApi`) and the Notification Dispatcher (`NotificationApi`).

pub mod inbound;
