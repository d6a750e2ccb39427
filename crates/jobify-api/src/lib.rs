//! Axum HTTP API server.
//!
//! This crate provides:
//! - The REST surface over the directory, workflow, and entitlement services
//! - HS256 session token verification
//! - Security headers and CORS
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
