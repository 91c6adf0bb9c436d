use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Stable error message constants shared across handlers.
pub mod msg {
    pub const UNKNOWN_PRODUCT: &str = "Unknown product";
    pub const EMPTY_RESUME_TEXT: &str = "Resume text must not be empty";
    pub const EMPTY_JOB_POSTING: &str = "Job posting text must not be empty";
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Payment session not found")]
    SessionNotFound,

    #[error("Payment session expired")]
    SessionExpired,

    #[error("Payment session already completed")]
    SessionAlreadyCompleted,

    #[error("Pricing unavailable: {0}")]
    PricingUnavailable(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    /// Stable machine-readable code, e.g. "session_already_completed".
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Session-state errors surface verbatim with distinct codes so the
        // caller can render "link expired" vs "already used" vs "invalid link".
        let (status, error, details) = match &self {
            AppError::SessionNotFound => (StatusCode::NOT_FOUND, "session_not_found", None),
            AppError::SessionExpired => (StatusCode::GONE, "session_expired", None),
            AppError::SessionAlreadyCompleted => {
                (StatusCode::CONFLICT, "session_already_completed", None)
            }
            AppError::PricingUnavailable(msg) => {
                // Both live and fallback resolution failed - a configuration
                // error, not a transient one.
                tracing::error!("Pricing unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "pricing_unavailable",
                    Some(msg.clone()),
                )
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse { error, details };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
