//! # API Error Type
//!
//! Unified error type returned to the frontend by form operations.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Ledgerly Forms                         │
//! │                                                                         │
//! │  form.apply_edit(...)                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Validation Error? ─── CoreError::Validation ──────┐                   │
//! │         │                                          │                    │
//! │         ▼                                          ▼                    │
//! │  submit_document(...)                           ApiError ──► frontend   │
//! │         │                                          ▲                    │
//! │         ▼                                          │                    │
//! │  Backend Error? ─── BackendError::Rejected ────────┘                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pricing itself never produces an error; everything here comes from
//! validation, the submission state machine or the backend.

use serde::Serialize;
use thiserror::Error;

use ledgerly_core::CoreError;

/// Errors from the backend collaborator.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend refused the payload (validation on its side).
    #[error("Backend rejected document: {0}")]
    Rejected(String),

    /// Bearer token missing or expired.
    #[error("Not authorized")]
    Unauthorized,

    /// Network failure or 5xx.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for form operations.
pub type FormResult<T> = Result<T, ApiError>;

/// Error returned from form operations.
///
/// ## Serialization
/// This is what the frontend receives when an operation fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "discount must be between 0 and 100"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for form responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Line item does not exist
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Document rule violated (too many items, ...)
    DocumentError,

    /// Submission already running, or stale attempt
    SubmissionConflict,

    /// Backend refused the document
    Rejected,

    /// Bearer token missing or expired
    Unauthorized,

    /// Backend could not be reached
    Unavailable,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates a submission conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::SubmissionConflict, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            CoreError::TooManyItems { .. } => {
                ApiError::new(ErrorCode::DocumentError, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

/// Converts backend errors to API errors.
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Rejected(reason) => ApiError::new(ErrorCode::Rejected, reason),
            BackendError::Unauthorized => {
                ApiError::new(ErrorCode::Unauthorized, "Session expired, please sign in again")
            }
            BackendError::Unavailable(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Backend unavailable: {}", e);
                ApiError::new(ErrorCode::Unavailable, "Could not reach the server")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}
