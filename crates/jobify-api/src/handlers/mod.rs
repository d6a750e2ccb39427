//! API handlers.

pub mod applications;
pub mod bookmarks;
pub mod companies;
pub mod health;
pub mod jobs;
pub mod plans;
pub mod users;

pub use health::{health, ready};
