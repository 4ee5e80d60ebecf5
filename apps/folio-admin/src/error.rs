//! # Service Error Types
//!
//! What the orchestrator returns, and what callers get to see.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in folio-admin                            │
//! │                                                                         │
//! │  ValidationError (folio-core) ──┐                                       │
//! │  StoreError      (folio-db)   ──┼──► ServiceError ──► ApiError          │
//! │  RenderError     (folio-render)─┘         │            (code, message,  │
//! │                                           │             retryable)      │
//! │  Forbidden / NotFound ────────────────────┘                             │
//! │                                                                         │
//! │  Validation / NotFound / Forbidden → detail passed through              │
//! │  Store / Render                    → logged with error!, message opaque │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Serialization
//! ```json
//! {
//!   "code": "NOT_FOUND",
//!   "message": "Invoice not found: inv_lq2x4k9a7f3c",
//!   "retryable": false
//! }
//! ```

use folio_core::ValidationError;
use folio_db::StoreError;
use folio_render::RenderError;
use serde::Serialize;
use thiserror::Error;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures of an [`InvoiceService`](crate::service::InvoiceService) call.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller did not present an admin token.
    #[error("Admin privileges required")]
    Forbidden,

    /// The request itself is wrong; the message says how.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No invoice with this id.
    #[error("Invoice not found: {id}")]
    NotFound { id: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ServiceError {
    pub fn not_found(id: impl Into<String>) -> Self {
        ServiceError::NotFound { id: id.into() }
    }
}

/// Error as shown to a caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Whether the same call might succeed later
    pub retryable: bool,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Admin token missing or rejected (403)
    Forbidden,

    /// Input validation failed (400)
    ValidationError,

    /// Invoice not found (404)
    NotFound,

    /// Persistence failed (500, or 503 when retryable)
    StoreError,

    /// Document generation failed (500)
    RenderError,
}

impl ErrorCode {
    /// HTTP status an HTTP front end would answer with.
    pub fn http_status(self, retryable: bool) -> u16 {
        match self {
            ErrorCode::Forbidden => 403,
            ErrorCode::ValidationError => 400,
            ErrorCode::NotFound => 404,
            ErrorCode::StoreError if retryable => 503,
            ErrorCode::StoreError | ErrorCode::RenderError => 500,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn http_status(&self) -> u16 {
        self.code.http_status(self.retryable)
    }
}

/// Converts service errors to caller-facing errors.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Forbidden => {
                ApiError::new(ErrorCode::Forbidden, "Admin privileges required")
            }
            ServiceError::Validation(e) => ApiError::new(ErrorCode::ValidationError, e.to_string()),
            ServiceError::NotFound { id } => {
                ApiError::new(ErrorCode::NotFound, format!("Invoice not found: {id}"))
            }
            ServiceError::Store(e) => {
                // Log the actual error but return a generic message
                tracing::error!(error = %e, "Invoice store failed");
                ApiError {
                    code: ErrorCode::StoreError,
                    message: "Invoice storage is unavailable".to_string(),
                    retryable: e.is_transient(),
                }
            }
            ServiceError::Render(e) => {
                tracing::error!(error = %e, "Invoice rendering failed");
                ApiError::new(ErrorCode::RenderError, "Invoice document could not be generated")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_detail_passes_through() {
        let api: ApiError = ServiceError::from(ValidationError::required("clientName")).into();
        assert_eq!(api.code, ErrorCode::ValidationError);
        assert_eq!(api.message, "clientName is required");
        assert_eq!(api.http_status(), 400);
    }

    #[test]
    fn test_store_detail_is_hidden() {
        let api: ApiError = ServiceError::from(StoreError::Query(
            "no such table: invoices at /var/lib/folio.db".to_string(),
        ))
        .into();
        assert_eq!(api.code, ErrorCode::StoreError);
        assert!(!api.message.contains("invoices"));
        assert!(!api.retryable);
        assert_eq!(api.http_status(), 500);
    }

    #[test]
    fn test_transient_store_error_is_retryable() {
        let api: ApiError = ServiceError::from(StoreError::Unavailable("timeout".into())).into();
        assert!(api.retryable);
        assert_eq!(api.http_status(), 503);
    }

    #[test]
    fn test_render_detail_is_hidden() {
        let api: ApiError = ServiceError::from(RenderError::Pdf("xref".into())).into();
        assert_eq!(api.code, ErrorCode::RenderError);
        assert!(!api.message.contains("xref"));
    }

    #[test]
    fn test_serialization() {
        let api: ApiError = ServiceError::not_found("inv_1").into();
        let json = serde_json::to_value(&api).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Invoice not found: inv_1");
        assert_eq!(json["retryable"], false);
        assert_eq!(
            serde_json::to_value(ApiError::from(ServiceError::Forbidden)).unwrap()["code"],
            "FORBIDDEN"
        );
    }
}
