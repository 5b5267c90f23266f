//! Request ID middleware for log correlation.
//!
//! Every request gets an `x-request-id`, either the one the caller sent or
//! a fresh UUID v4, echoed back on the response. Refusals produced by
//! [`ApiError`](super::error::ApiError) are logged here under that ID.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use uuid::Uuid;

use super::error::Rejection;
use crate::logging::log_rejected_request;

/// Header name for request ID
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn get_or_generate_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

/// Middleware to tag every request and response with a request ID
///
/// # Example
///
/// ```no_run
/// use axum::{Router, routing::get, middleware};
/// use tournaments_server::api::request_id::request_id_middleware;
///
/// let app: Router = Router::new()
///     .route("/", get(|| async { "Hello" }))
///     .layer(middleware::from_fn(request_id_middleware));
/// ```
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = get_or_generate_request_id(request.headers());
    let started = Instant::now();

    tracing::info!(
        request_id = %request_id,
        method = %request.method(),
        uri = %request.uri(),
        "Request started"
    );

    let mut response = next.run(request).await;

    if let Some(rejection) = response.extensions().get::<Rejection>() {
        log_rejected_request(
            &request_id,
            response.status().as_u16(),
            rejection.kind,
            &rejection.detail,
        );
    }

    if let Ok(header_value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, header_value);
    }

    tracing::info!(
        request_id = %request_id,
        status = %response.status(),
        duration_ms = started.elapsed().as_millis() as u64,
        "Request completed"
    );

    response
}
