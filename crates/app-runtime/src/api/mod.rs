//! # Boundary Facade
//!
//! The operations the rest of the application (HTTP layer, templates)
//! calls. Every method takes the already authenticated `Principal`, runs
//! the subsystem call on the blocking pool, publishes a post-commit event
//! and returns serde-serializable views.

pub mod app;
pub mod errors;
pub mod views;

pub use app::TreewatchApp;
pub use errors::ApiError;
pub use views::{FlaggedView, NotificationView, SubmissionView};
