//! # Adapters
//!
//! Port implementations that live outside the subsystem crates.

pub mod storage;
