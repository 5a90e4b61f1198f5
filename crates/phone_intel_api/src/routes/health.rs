//! Health check route

use crate::AppState;
use axum::{extract::State, response::Json};
use phone_core::report::timestamp_now;
use serde::Serialize;
use std::sync::Arc;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: &'static str,
    pub timestamp: String,
}

/// Health check endpoint - GET /health
///
/// Reports the service as operational whenever it can answer.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "operational",
        service: state.config.observability.service_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        timestamp: timestamp_now(),
    })
}
