/// Error types for social-feed-service
///
/// Errors carry a stable kind plus a human-readable message and are
/// converted to JSON HTTP responses for API clients. Backing-store
/// failures are surfaced as `Unavailable` without leaking driver details.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed pagination, missing required ids
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Referenced user/post/notification does not exist
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller is not the resource owner/recipient
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Reserved; dedup resolves conflicts by merging, not erroring
    #[error("conflict: {0}")]
    Conflict(String),

    /// Backing store I/O failure
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Anything else
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidArgument(_) => "INVALID_ARGUMENT",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Unavailable(_) => "UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL",
        }
    }

    /// Message safe to show to API clients. Store and internal errors are
    /// replaced with a generic message; the detail goes to the log.
    fn public_message(&self) -> String {
        match self {
            AppError::Unavailable(_) => "backing store unavailable".to_string(),
            AppError::Internal(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }

        HttpResponse::build(status).json(serde_json::json!({
            "error": {
                "kind": self.kind(),
                "message": self.public_message(),
            }
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Unavailable(err.to_string())
    }
}
