//! Phone intelligence route handlers
//!
//! GET reads `phone` from the query string. POST reads it from a JSON body
//! when the request says it carries JSON, and from a urlencoded form
//! otherwise. Both produce the same report.

use crate::{api_handler::*, middleware::RequestId, AppState};
use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        FromRequest, Query, Request, State,
    },
    http::{header::CONTENT_TYPE, HeaderMap},
    response::Json,
    Extension, Form,
};
use phone_core::{privacy::mask_number, PhoneReport};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Urlencoded key/value pairs; a repeated key keeps every value
type Pairs = Vec<(String, String)>;

/// GET /phone_intel?phone=9876543210
///
/// A repeated `phone` parameter uses its first value.
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn phone_intel_get_handler(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    query: Result<Query<Pairs>, QueryRejection>,
) -> ApiResult<PhoneReport> {
    let Query(pairs) = query.map_err(|rejection| {
        warn!("Rejected query string: {}", rejection.body_text());
        ApiError::InvalidInput(rejection.body_text())
    })?;

    generate(&state, &PhoneQuery::from_pairs(pairs)).await
}

/// POST /phone_intel with `{"phone": "..."}` or `phone=...`
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn phone_intel_post_handler(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    request: Request,
) -> ApiResult<PhoneReport> {
    let query = if is_json_request(request.headers()) {
        let Json(query) = Json::<PhoneQuery>::from_request(request, &state)
            .await
            .map_err(|rejection| {
                warn!("Rejected JSON body: {}", rejection.body_text());
                ApiError::InvalidInput(rejection.body_text())
            })?;
        query
    } else {
        match Form::<Pairs>::from_request(request, &state).await {
            Ok(Form(pairs)) => PhoneQuery::from_pairs(pairs),
            // No form at all means no phone parameter
            Err(FormRejection::InvalidFormContentType(_)) => PhoneQuery::default(),
            Err(rejection) => {
                warn!("Rejected form body: {}", rejection.body_text());
                return Err(ApiError::InvalidInput(rejection.body_text()));
            }
        }
    };

    generate(&state, &query).await
}

async fn generate(state: &AppState, query: &PhoneQuery) -> ApiResult<PhoneReport> {
    let Some(phone) = query.phone() else {
        warn!("Request without a phone parameter");
        return Err(ApiError::MissingPhone);
    };

    info!("Generating report for {}", mask_number(phone));

    let report = state
        .pipeline
        .generate_report(phone)
        .await
        .map_err(|e| {
            if e.is_input_error() {
                warn!("Rejected phone input: {}", e);
            } else {
                error!("Report generation failed: {}", e);
            }
            ApiError::from(e)
        })?;

    debug!(
        "Report ready: operator={}, circle={}, source={}",
        report.telecom_details.operator,
        report.telecom_details.circle,
        report.metadata.data_source
    );

    Ok(Json(report))
}

/// `application/json` or any `application/*+json` media type
fn is_json_request(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|value| value.to_str().ok()) else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}
