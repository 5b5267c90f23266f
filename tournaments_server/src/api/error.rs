//! Mapping from registry errors to HTTP problem-detail responses.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tournaments::{ErrorKind, RegistryError};

/// Problem-detail body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ProblemDetail {
    pub title: String,
    pub status: u16,
    pub detail: String,
}

/// Why a request was refused, attached to the response for the request-id
/// middleware to log
#[derive(Debug, Clone)]
pub struct Rejection {
    pub kind: &'static str,
    /// Full error text, storage details included
    pub detail: String,
}

/// Error returned by API handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    /// HTTP status for this error
    ///
    /// Name and nickname collisions answer 409 even though the registry
    /// classifies them as validation failures.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Registry(err) if err.is_uniqueness_violation() => StatusCode::CONFLICT,
            ApiError::Registry(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn kind_label(&self) -> &'static str {
        match self {
            ApiError::Registry(err) => match err.kind() {
                ErrorKind::NotFound => "NotFound",
                ErrorKind::Validation => "Validation",
                ErrorKind::Conflict => "Conflict",
                ErrorKind::Storage => "Storage",
            },
            ApiError::BadRequest(_) => "MalformedRequest",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Storage internals are logged in full but never returned
        let rejection = Rejection {
            kind: self.kind_label(),
            detail: self.to_string(),
        };

        let detail = match &self {
            ApiError::Registry(err) => err.client_message(),
            ApiError::BadRequest(msg) => msg.clone(),
        };

        let body = ProblemDetail {
            title: status
                .canonical_reason()
                .unwrap_or("Error")
                .to_string(),
            status: status.as_u16(),
            detail,
        };

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(rejection);
        response
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
