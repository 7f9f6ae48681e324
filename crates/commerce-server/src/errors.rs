//! API error type and its HTTP mapping.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use commerce_core::StorageError;

/// Application-level errors surfaced to HTTP callers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication failed")]
    AuthenticationError,

    #[error("Authorization denied: {0}")]
    AuthorizationError(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::CategoryNotFound(_)
            | ApiError::ProductNotFound(_)
            | ApiError::OrderNotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
                error: self.to_string(),
                code: "NOT_FOUND",
            }),
            ApiError::ValidationError(_) => HttpResponse::BadRequest().json(ErrorResponse {
                error: self.to_string(),
                code: "VALIDATION_ERROR",
            }),
            ApiError::AuthenticationError => HttpResponse::Unauthorized().json(ErrorResponse {
                error: self.to_string(),
                code: "AUTH_ERROR",
            }),
            ApiError::AuthorizationError(_) => HttpResponse::Forbidden().json(ErrorResponse {
                error: self.to_string(),
                code: "FORBIDDEN",
            }),
            // Storage errors reaching a handler through a body
            // reference (unknown product/user id, duplicate username,
            // empty product set) are caller mistakes; anything else is
            // an internal failure. Path-level misses never take this
            // route — handlers map those to the 404 variants above.
            ApiError::Storage(inner) => match inner {
                StorageError::NotFound { .. }
                | StorageError::Conflict { .. }
                | StorageError::InvalidValue { .. } => {
                    HttpResponse::BadRequest().json(ErrorResponse {
                        error: inner.to_string(),
                        code: "VALIDATION_ERROR",
                    })
                }
                _ => {
                    tracing::error!(error = %inner, "storage failure");
                    HttpResponse::InternalServerError().json(ErrorResponse {
                        error: "Internal server error".to_string(),
                        code: "INTERNAL_ERROR",
                    })
                }
            },
        }
    }
}

#[derive(serde::Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

/// Result type alias for handler returns.
pub type ApiResult<T> = Result<T, ApiError>;
