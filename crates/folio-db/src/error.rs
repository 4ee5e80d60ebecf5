//! # Store Error Types
//!
//! Error types for both store backends.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  sqlx::Error (embedded)        reqwest::Error / HTTP status (remote)    │
//! │       │                                 │                               │
//! │       └──────────────┬──────────────────┘                               │
//! │                      ▼                                                  │
//! │  StoreError (this module) ← one vocabulary for both backends            │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │  ServiceError → ApiError (opaque message, `retryable` flag)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "Not found" is never an error here: lookups return `Option`, mutations
//! return `bool`. Every variant below means the store itself failed.

use thiserror::Error;

/// Persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An invoice with this id already exists.
    #[error("Duplicate invoice id: {id}")]
    Duplicate { id: String },

    /// The store could not be opened.
    ///
    /// ## When This Occurs
    /// - Database file can't be created (permissions, disk full)
    /// - Remote client misconfigured (bad URL, TLS init)
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// SQL execution failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Pool exhausted (all connections in use).
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The remote service could not be reached (network error, timeout).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The remote service answered with an error status.
    #[error("Remote store returned {status}: {message}")]
    Remote { status: u16, message: String },

    /// The remote service answered with something we can't decode.
    #[error("Unexpected response from remote store: {0}")]
    Protocol(String),

    /// A stored document no longer decodes as an invoice.
    #[error("Stored invoice {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },

    /// An invoice could not be encoded for storage.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl StoreError {
    /// True when retrying the same call later might succeed.
    ///
    /// ```rust
    /// use folio_db::StoreError;
    ///
    /// assert!(StoreError::Unavailable("timeout".into()).is_transient());
    /// assert!(StoreError::Remote { status: 503, message: String::new() }.is_transient());
    /// assert!(!StoreError::Remote { status: 400, message: String::new() }.is_transient());
    /// assert!(!StoreError::Query("syntax".into()).is_transient());
    /// ```
    pub fn is_transient(&self) -> bool {
        match self {
            StoreError::Unavailable(_) | StoreError::PoolExhausted => true,
            StoreError::Remote { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::Database (UNIQUE) → StoreError::Duplicate
/// sqlx::Error::Database (other)  → StoreError::Query
/// sqlx::Error::PoolTimedOut      → StoreError::PoolExhausted
/// sqlx::Error::PoolClosed        → StoreError::Connection
/// Other                          → StoreError::Query
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let msg = db_err.message();
                if msg.contains("UNIQUE constraint failed") {
                    StoreError::Duplicate {
                        id: "unknown".to_string(),
                    }
                } else {
                    StoreError::Query(msg.to_string())
                }
            }
            sqlx::Error::PoolTimedOut => StoreError::PoolExhausted,
            sqlx::Error::PoolClosed => StoreError::Connection("Pool is closed".to_string()),
            _ => StoreError::Query(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Migration(err.to_string())
    }
}

/// Transport-level reqwest failures are transient; decode failures are not.
impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Protocol(err.to_string())
        } else if err.is_builder() {
            StoreError::Connection(err.to_string())
        } else {
            StoreError::Unavailable(err.to_string())
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
