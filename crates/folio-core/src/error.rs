//! # Error Types
//!
//! Validation errors for folio-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  folio-core     ValidationError  - Input validation failures (this file)│
//! │  folio-db       StoreError       - Persistence failures                 │
//! │  folio-render   RenderError      - Document generation failures         │
//! │  folio-admin    ServiceError     - Orchestrator failures                │
//! │                 ApiError         - What callers see (serialized)        │
//! │                                                                         │
//! │  Flow: ValidationError ─┐                                               │
//! │        StoreError ──────┼──► ServiceError ──► ApiError ──► Caller       │
//! │        RenderError ─────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors are always correctable by the caller, so every variant
//! names the offending field path (`services[2].name`, `footer.terms`).

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any business logic runs. Never retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Numeric value is below zero.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value is not a finite number (or a string that parses as one).
    #[error("{field} must be a number")]
    InvalidNumber { field: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// Two fields that must agree were given different values.
    #[error("{field} conflicts with {other}")]
    Conflict { field: String, other: String },

    /// Too many entries in a list field.
    #[error("{field} must have at most {max} entries")]
    TooMany { field: String, max: usize },

    /// Every service line was empty or dropped.
    #[error("at least one service line with a name is required")]
    NoLineItems,

    /// Payload could not be parsed (bad JSON, wrong type, unknown field).
    #[error("malformed payload: {0}")]
    Malformed(String),
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Required`].
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Shorthand for [`ValidationError::TooLong`].
    pub fn too_long(field: impl Into<String>, max: usize) -> Self {
        ValidationError::TooLong {
            field: field.into(),
            max,
        }
    }
}

impl From<serde_json::Error> for ValidationError {
    fn from(err: serde_json::Error) -> Self {
        ValidationError::Malformed(err.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
