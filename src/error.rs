//! API error taxonomy.
//!
//! Every failed operation surfaces synchronously as one of these categories
//! with a human-readable reason; there is no local recovery, retry, or
//! compensation for partial multi-document writes. The response body carries
//! the reason only; store internals are never exposed beyond
//! "could not <action>".

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::directory::validate::FieldViolation;

/// Convenience alias used throughout the directory service.
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors returned by the user directory API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A referenced user, friend, or document does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The request conflicts with existing state (e.g. duplicate username).
    #[error("{0}")]
    Conflict(String),

    /// The request names an invalid relationship state.
    #[error("{0}")]
    BadRequest(String),

    /// Self-referential friend operations.
    #[error("{0}")]
    Forbidden(String),

    /// One or more request fields failed validation.
    #[error("request validation failed")]
    Validation(Vec<FieldViolation>),

    /// The store reported no effect, or a write failed unexpectedly.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Validation(violations) => json!({
                "error": self.to_string(),
                "fields": violations,
            }),
            _ => json!({ "error": self.to_string() }),
        };
        (status, Json(body)).into_response()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::BadRequest("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Validation(vec![]).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_reason_is_the_display_string() {
        let err = ApiError::NotFound("could not find user".into());
        assert_eq!(err.to_string(), "could not find user");
    }
}
