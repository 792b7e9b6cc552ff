//! # Domain Layer - Moderation
//!
//! - `guard`: the authorization predicate
//! - `transitions`: pure record mutations for each action
//! - `value_objects`: requests, outcomes, configuration
//! - `errors`: ModerationError

pub mod errors;
pub mod guard;
pub mod transitions;
pub mod value_objects;
