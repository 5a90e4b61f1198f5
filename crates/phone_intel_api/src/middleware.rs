//! Middleware for request correlation, response headers and panic recovery
//!
//! This module contains the middleware functions wired into the router by
//! `create_router`.

use crate::api_handler::{ApiError, ErrorResponse};
use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::{any::Any, fmt};
use tracing::{debug, error, warn};
use uuid::Uuid;

/// Header carrying the request identifier
pub static REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID shared by the header, the handler span and error bodies
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request ID propagation middleware
///
/// Reuses an incoming request ID when present, otherwise generates one. The
/// ID is stored in the request extensions for handlers, echoed in the
/// response header and written into error bodies.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let request_id = extract_or_generate_request_id(request.headers());

    debug!("Processing request: {}", request_id);

    let header_value = HeaderValue::from_str(&request_id).ok();
    if let Some(value) = &header_value {
        request.headers_mut().insert(REQUEST_ID_HEADER.clone(), value.clone());
    }
    request.extensions_mut().insert(RequestId(request_id.clone()));

    let response = next.run(request).await;
    let mut response = stamp_error_body(response, &request_id);

    if response.status().is_server_error() {
        error!("Server error occurred for request: {}", request_id);
    } else if response.status().is_client_error() {
        warn!("Client error for request {}: {}", request_id, response.status());
    }

    if let Some(value) = header_value {
        response.headers_mut().insert(REQUEST_ID_HEADER.clone(), value);
    }

    response
}

/// Rewrite an `ApiError` body so its `request_id` matches the header
fn stamp_error_body(mut response: Response, request_id: &str) -> Response {
    let Some(mut error) = response.extensions_mut().remove::<ErrorResponse>() else {
        return response;
    };
    error.request_id = request_id.to_string();

    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Json(error).into_response().into_body())
}

/// Extract the request ID from headers or generate a new one
fn extract_or_generate_request_id(headers: &HeaderMap) -> String {
    for name in ["x-trace-id", "x-request-id"] {
        if let Some(id) = headers.get(name).and_then(|value| value.to_str().ok()) {
            if !id.is_empty() {
                return id.to_string();
            }
        }
    }

    Uuid::new_v4().to_string()
}

/// Security headers middleware
///
/// Adds security-related headers to all responses.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();

    headers.insert("x-content-type-options", HeaderValue::from_static("nosniff"));
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert("referrer-policy", HeaderValue::from_static("no-referrer"));
    headers.insert("cache-control", HeaderValue::from_static("no-store"));

    headers.insert("x-api-version", HeaderValue::from_static(env!("CARGO_PKG_VERSION")));
    headers.insert("x-powered-by", HeaderValue::from_static("phone-intel-api"));

    response
}

/// Convert a handler panic into the standard 500 error body
///
/// The panic message is passed through to the caller.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!("Handler panicked: {}", message);

    ApiError::InternalError(message).into_response()
}
