//! API Routes Module
//!
//! This module organizes all HTTP endpoints into logical groups:
//! - `home`: Static description of the available endpoints
//! - `phone_intel`: Phone intelligence reports, by query string or body
//! - `health`: Liveness check

pub mod health;
pub mod home;
pub mod phone_intel;

use crate::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// Build all API routes and return a configured Router
///
/// Both report paths are served by the same handlers.
pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home::home_handler))
        // Report endpoints
        .route(
            "/phone_intel",
            get(phone_intel::phone_intel_get_handler).post(phone_intel::phone_intel_post_handler),
        )
        .route(
            "/phone_info",
            get(phone_intel::phone_intel_get_handler).post(phone_intel::phone_intel_post_handler),
        )
        .route("/health", get(health::health_handler))
        .with_state(state)
}
