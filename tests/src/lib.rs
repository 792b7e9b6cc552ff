//! # Treewatch Test Suite
//!
//! Unified test crate for behaviour that spans subsystems.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── flows.rs        # End-to-end moderation scenarios through the facade
//!     ├── concurrency.rs  # Racing transitions on one record
//!     └── properties.rs   # Randomized operation sequences against the invariants
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p tw-tests
//!
//! # By category
//! cargo test -p tw-tests integration::concurrency::
//!
//! # Against RocksDB as well
//! cargo test -p tw-tests --features rocksdb
//! ```

#![allow(dead_code)]

pub mod integration;
