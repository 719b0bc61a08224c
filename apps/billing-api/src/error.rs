//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Billing API                        │
//! │                                                                         │
//! │  Handler → Service → Result<T, ApiError>                               │
//! │                           │                                             │
//! │       ┌───────────────────┼──────────────────────┐                     │
//! │       ▼                   ▼                      ▼                     │
//! │  CoreError           DbError               JsonRejection               │
//! │  (pricing,           (sqlx, logged,        (malformed body)            │
//! │   validation)         generic message)                                  │
//! │       │                   │                      │                     │
//! │       └───────────────────┼──────────────────────┘                     │
//! │                           ▼                                             │
//! │                ApiError { code, message }                               │
//! │                           │                                             │
//! │                           ▼                                             │
//! │            HTTP status + { "error": "<message>" }                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! | ErrorCode        | Status |
//! |------------------|--------|
//! | ValidationError  | 400    |
//! | NotFound         | 404    |
//! | Unavailable      | 400    |
//! | StorageError     | 500    |

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use pizzeria_core::{CoreError, ValidationError};
use pizzeria_db::DbError;

/// Result type for services and handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error returned from handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Machine-readable category, decides the HTTP status
    pub code: ErrorCode,

    /// Human-readable message sent to the client
    pub message: String,
}

/// Error categories for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed (400)
    ValidationError,

    /// Resource not found (404)
    NotFound,

    /// Item exists but cannot be sold (400)
    Unavailable,

    /// Storage operation failed (500)
    StorageError,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError | ErrorCode::Unavailable => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::StorageError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Logs a storage failure and hides its detail behind `message`.
    pub fn storage(message: impl Into<String>, err: DbError) -> Self {
        let message = message.into();
        tracing::error!(error = %err, "{}", message);
        ApiError::new(ErrorCode::StorageError, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(_) => ApiError::not_found(err.to_string()),
            CoreError::InvoiceNotFound(_) => ApiError::not_found("Invoice not found"),
            CoreError::ItemUnavailable { .. } => {
                ApiError::new(ErrorCode::Unavailable, err.to_string())
            }
            CoreError::Validation(inner) => inner.into(),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Malformed or mistyped JSON bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation(format!("Invalid request data: {}", rejection.body_text()))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: &self.message,
        });
        (self.status(), body).into_response()
    }
}
