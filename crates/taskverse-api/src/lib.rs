//! Axum HTTP API server for the TaskVerse job board.
//!
//! This crate provides:
//! - REST endpoints for job postings and accepted tasks
//! - Firebase ID token verification behind a configurable gate policy
//! - Prometheus metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::{ApiConfig, AuthPolicy};
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
