//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kasir POS                              │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                          │
//! │       │                                                                 │
//! │       ├── ValidationError / CoreError ──► 400 (client can fix)         │
//! │       ├── DbError::NotFound ────────────► 404                          │
//! │       ├── DbError::PoolExhausted ───────► 503                          │
//! │       └── other DbError ────────────────► 500, details only in logs    │
//! │                                                                         │
//! │  Body:  { "code": "INSUFFICIENT_STOCK",                                │
//! │           "message": "Insufficient stock for product 7 (Kopi): ..." }  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use kasir_core::{CoreError, ValidationError};
use kasir_db::{CheckoutError, DbError};

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Product not found: 999"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// HTTP status, not part of the body
    #[serde(skip)]
    pub status: StatusCode,

    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Not enough stock to complete a checkout
    InsufficientStock,

    /// Database operation failed
    DatabaseError,

    /// Internal server error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            code,
            message: message.into(),
        }
    }

    /// Creates a 404 for a resource addressed by the request path.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(
            StatusCode::NOT_FOUND,
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::Internal,
            message,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Converts database errors to API errors.
///
/// Server-side failures are logged with their detail and answered with a
/// generic message.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::UniqueViolation { field, .. } => {
                ApiError::validation(format!("Duplicate value for {}", field))
            }
            DbError::ForeignKeyViolation { message } => {
                tracing::warn!(%message, "Foreign key violation");
                ApiError::validation("Invalid reference: related record does not exist")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(
                    StatusCode::SERVICE_UNAVAILABLE,
                    ErrorCode::DatabaseError,
                    "Database is busy, try again",
                )
            }
            DbError::Internal(message) => {
                tracing::error!(%message, "Internal database error");
                ApiError::internal("Internal server error")
            }
            other => {
                tracing::error!(error = %other, "Database operation failed");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DatabaseError,
                    "Database operation failed",
                )
            }
        }
    }
}

/// Converts core errors to API errors.
///
/// These come from the body of a request (checkout lines), so a missing
/// product is a 400 rather than a 404.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match &err {
            CoreError::ProductNotFound(_) => {
                ApiError::new(StatusCode::BAD_REQUEST, ErrorCode::NotFound, err.to_string())
            }
            CoreError::InsufficientStock { .. } => ApiError::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::InsufficientStock,
                err.to_string(),
            ),
            CoreError::AmountOverflow { .. } => ApiError::validation(err.to_string()),
            CoreError::Validation(inner) => ApiError::validation(inner.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Rejected(err) => err.into(),
            CheckoutError::Storage(err) => err.into(),
        }
    }
}

// =============================================================================
// Extractor Rejections
// =============================================================================

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_code_and_message_only() {
        let err = ApiError::not_found("Product", 42);
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Product not found: 42");
        assert!(json.get("status").is_none());
    }

    #[test]
    fn test_checkout_rejections_are_bad_requests() {
        let err: ApiError = CheckoutError::Rejected(CoreError::ProductNotFound(999)).into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: ApiError = CoreError::InsufficientStock {
            product_id: 1,
            name: "Kopi".to_string(),
            available: 1,
            requested: 2,
        }
        .into();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, ErrorCode::InsufficientStock);
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let err: ApiError = DbError::QueryFailed("no such table: orders".to_string()).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(!err.message.contains("orders"));

        let err: ApiError = DbError::PoolExhausted.into();
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_path_lookup_not_found_is_404() {
        let err: ApiError = DbError::not_found("Category", 3).into();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.message, "Category not found: 3");
    }
}
