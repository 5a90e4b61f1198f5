//! Shared API types and utilities
//!
//! This module contains the request types, error handling and error response
//! shape used across all API endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use phone_core::IntelError;
use serde::{Deserialize, Deserializer, Serialize};

/// Example request included in client error responses
pub const EXAMPLE_REQUEST: &str = "/phone_info?phone=9876543210";

/// Phone parameter, from the query string, a JSON body or a form body
#[derive(Debug, Default, Deserialize)]
pub struct PhoneQuery {
    /// Phone number in any supported format
    #[serde(default, deserialize_with = "phone_param")]
    pub phone: Option<String>,
}

impl PhoneQuery {
    /// Build from urlencoded pairs, keeping the first `phone` value
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            phone: pairs
                .into_iter()
                .find(|(key, _)| key == "phone")
                .map(|(_, value)| value),
        }
    }

    /// The phone parameter, treating an empty value as missing
    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref().filter(|phone| !phone.is_empty())
    }
}

/// JSON clients sometimes send the number as a number
#[derive(Deserialize)]
#[serde(untagged)]
enum PhoneValue {
    Text(String),
    Number(serde_json::Number),
}

fn phone_param<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<PhoneValue>::deserialize(deserializer)?.map(|value| match value {
        PhoneValue::Text(text) => text,
        PhoneValue::Number(number) => number.to_string(),
    }))
}

/// Error response structure
///
/// `request_id` is left empty here and filled in by the request-id
/// middleware, which finds a copy of this struct in the response extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always "error"
    pub status: String,
    pub message: String,
    /// Example of a well-formed request, for client errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    pub error_code: String,
    pub request_id: String,
    pub timestamp: String,
}

/// Result type for API handlers
pub type ApiResult<T> = Result<Json<T>, ApiError>;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    /// The `phone` parameter was absent or empty
    MissingPhone,
    /// The phone number or request body could not be understood
    InvalidInput(String),
    /// Anything unexpected; the message is passed through to the caller
    InternalError(String),
}

impl From<IntelError> for ApiError {
    fn from(err: IntelError) -> Self {
        match err {
            IntelError::EmptyInput => ApiError::MissingPhone,
            IntelError::InvalidFormat => ApiError::InvalidInput(err.to_string()),
            IntelError::ConfigurationError(msg) => ApiError::InternalError(msg),
            IntelError::InternalError(e) => ApiError::InternalError(e.to_string()),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingPhone | ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_code, message, example) = match self {
            ApiError::MissingPhone => (
                "MISSING_PARAMETER",
                "Phone number parameter is required".to_string(),
                Some(EXAMPLE_REQUEST.to_string()),
            ),
            ApiError::InvalidInput(msg) => ("INVALID_INPUT", msg, Some(EXAMPLE_REQUEST.to_string())),
            ApiError::InternalError(msg) => ("INTERNAL_ERROR", format!("Server error: {}", msg), None),
        };

        let error_response = ErrorResponse {
            status: "error".to_string(),
            message,
            example,
            error_code: error_code.to_string(),
            request_id: String::new(),
            timestamp: phone_core::report::timestamp_now(),
        };

        let mut response = (status, Json(error_response.clone())).into_response();
        response.extensions_mut().insert(error_response);
        response
    }
}
