//! # Error Types
//!
//! Domain-specific error types for ledgerly-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ledgerly-core errors (this file)                                      │
//! │  ├── CoreError        - Document rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  ledgerly-forms errors (separate crate)                                │
//! │  ├── BackendError     - Submission failures                            │
//! │  └── ApiError         - What the frontend sees (serialized)            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Frontend               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The pricing engine itself never returns these: it degrades to zeroed
//! output. They are raised by the validation the form layer runs before
//! applying an edit.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Document rule violations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No line at the given position.
    #[error("Line item {index} not found (document has {len} items)")]
    ItemNotFound { index: usize, len: usize },

    /// Document has reached the maximum number of lines.
    #[error("Document cannot have more than {max} items")]
    TooManyItems { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustNotBeNegative { field: String },
}

// =============================================================================
// Unit Tests
// =============================================================================
