//! # Domain Layer - Notification Dispatcher

pub mod entities;
pub mod errors;
pub mod keys;
pub mod messages;
pub mod value_objects;

pub use entities::*;
pub use errors::*;
pub use value_objects::*;
