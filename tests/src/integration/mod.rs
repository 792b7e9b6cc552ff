//! Cross-subsystem integration tests.
//!
//! `harness` wires the real services over an in-memory store with a
//! manually driven clock.

pub mod concurrency;
pub mod flows;
pub mod harness;
pub mod properties;
