//! # Ports Layer
//!
//! - `inbound.rs` - Driving port used by the Moderation Engine and the facade

pub mod inbound;
