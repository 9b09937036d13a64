use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type; every variant maps to one HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid request input.
    #[error("{0}")]
    BadRequest(String),

    /// Credential mismatch.
    #[error("{0}")]
    Unauthorized(String),

    /// No matching user or video.
    #[error("{0}")]
    NotFound(String),

    /// Uniqueness constraint violation.
    #[error("{0}")]
    Conflict(String),

    /// Upstream catalog failure; proxies the upstream status when one exists.
    #[error("{message}")]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    /// Unexpected in-process failure.
    #[error("{0}")]
    Internal(String),

    /// Unexpected persistence failure. Details are logged, not sent.
    #[error("Database error")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Upstream { status, .. } => status
                .and_then(|code| StatusCode::from_u16(code).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Database(e) => {
                error!(error = %e, "database error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

/// True when the error is a store-level uniqueness violation, which the
/// handlers translate into a `Conflict` for the offending field pair.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
