//! Manager error types with HTTP status code mapping.
//!
//! [`ManagerError`] is the central error type for the crate. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//! None of them is fatal to the process: services turn failures into
//! transient [`crate::domain::Notice`]s and keep running.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1003,
///     "message": "book cover is required",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 2000–2999 | Not Found  | 404 Not Found             |
/// | 3000–3999 | Server     | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Book form submitted without a title.
    #[error("book title is required")]
    MissingTitle,

    /// Book form submitted without a summary.
    #[error("book summary is required")]
    MissingSummary,

    /// Book form submitted without a cover URL or uploaded image.
    #[error("book cover is required")]
    MissingCover,

    /// A store document could not be converted into a typed record.
    #[error("invalid document {id}: {reason}")]
    InvalidDocument {
        /// Store identifier of the offending document.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Book with the given ID was not found.
    #[error("book not found: {0}")]
    BookNotFound(i64),

    /// Document store read, write, or delete failure.
    #[error("store error: {0}")]
    StoreError(String),

    /// Object storage upload failure.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ManagerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1000,
            Self::MissingTitle => 1001,
            Self::MissingSummary => 1002,
            Self::MissingCover => 1003,
            Self::InvalidDocument { .. } => 1004,
            Self::BookNotFound(_) => 2001,
            Self::Internal(_) => 3000,
            Self::StoreError(_) => 3001,
            Self::StorageError(_) => 3002,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_)
            | Self::MissingTitle
            | Self::MissingSummary
            | Self::MissingCover
            | Self::InvalidDocument { .. } => StatusCode::BAD_REQUEST,
            Self::BookNotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreError(_) | Self::StorageError(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns `true` for errors raised by form validation, before any
    /// gateway call was made.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingTitle | Self::MissingSummary | Self::MissingCover
        )
    }
}

impl From<sqlx::Error> for ManagerError {
    fn from(err: sqlx::Error) -> Self {
        Self::StoreError(err.to_string())
    }
}

impl IntoResponse for ManagerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_map_to_bad_request() {
        for err in [
            ManagerError::MissingTitle,
            ManagerError::MissingSummary,
            ManagerError::MissingCover,
        ] {
            assert!(err.is_validation());
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn store_error_is_server_side() {
        let err = ManagerError::StoreError("connection reset".to_string());
        assert!(!err.is_validation());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.error_code(), 3001);
    }

    #[test]
    fn book_not_found_code() {
        let err = ManagerError::BookNotFound(42);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "book not found: 42");
    }
}
