//! # Domain Layer - Record Store Subsystem
//!
//! - `entities`: TreeRecord and its lifecycle view
//! - `value_objects`: listing filters, summary, configuration
//! - `keys`: key layout in the shared key-value store
//! - `errors`: RecordStoreError enumeration

pub mod entities;
pub mod errors;
pub mod keys;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
