//! Service index route

use crate::{api_handler::EXAMPLE_REQUEST, AppState};
use axum::{extract::State, response::Json};
use serde::Serialize;
use std::sync::Arc;

/// Index response listing the public endpoints
#[derive(Serialize)]
pub struct HomeResponse {
    pub service: String,
    pub version: &'static str,
    pub endpoints: Vec<EndpointInfo>,
    pub example: &'static str,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: &'static str,
    pub methods: &'static str,
    pub description: &'static str,
}

/// GET /
pub async fn home_handler(State(state): State<Arc<AppState>>) -> Json<HomeResponse> {
    Json(HomeResponse {
        service: state.config.observability.service_name.clone(),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: vec![
            EndpointInfo {
                path: "/phone_intel",
                methods: "GET, POST",
                description: "Full intelligence report for a phone number (parameter: phone)",
            },
            EndpointInfo {
                path: "/phone_info",
                methods: "GET, POST",
                description: "Alias of /phone_intel",
            },
            EndpointInfo {
                path: "/health",
                methods: "GET",
                description: "Service health check",
            },
        ],
        example: EXAMPLE_REQUEST,
    })
}
