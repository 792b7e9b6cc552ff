//! # Event Handlers
//!
//! Background consumers of the post-commit event bus.

pub mod audit;

pub use audit::AuditHandler;
