//! # folio-db: Invoice Persistence
//!
//! One [`InvoiceStore`] contract with two interchangeable backends.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Folio Data Flow                                  │
//! │                                                                         │
//! │  InvoiceService (folio-admin)                                           │
//! │       │  Arc<dyn InvoiceStore>                                          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     folio-db (THIS CRATE)                       │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │ InvoiceRepo   │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │◄───│ (SQLite)      │    │  (embedded)  │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  │                        ┌───────────────┐    ┌──────────────┐    │    │
//! │  │                        │ RestInvoice   │    │ Legacy JSON  │    │    │
//! │  │                        │ Store (HTTP)  │    │ import       │    │    │
//! │  │                        └───────────────┘    └──────────────┘    │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The `InvoiceStore` trait and the persisted row layout
//! - [`pool`] - SQLite pool creation and configuration
//! - [`migrations`] - Embedded schema migrations
//! - [`repository`] - SQLite `InvoiceStore`
//! - [`remote`] - PostgREST `InvoiceStore`
//! - [`legacy`] - One-time import of the old JSON snapshot
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use folio_db::{open_store, DbConfig, StoreConfig};
//!
//! let store = open_store(&StoreConfig::Embedded(DbConfig::new("data/folio.db"))).await?;
//! let invoices = store.list().await?;
//! ```

use std::sync::Arc;
use tracing::info;

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod legacy;
pub mod migrations;
pub mod pool;
pub mod remote;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use legacy::{migrate_legacy_snapshot, DEFAULT_SNAPSHOT_PATH};
pub use pool::{Database, DbConfig};
pub use remote::{RemoteConfig, RestInvoiceStore};
pub use repository::invoice::InvoiceRepository;
pub use store::{InvoiceRow, InvoiceStore};

/// Which backend to open.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// SQLite file on this machine.
    Embedded(DbConfig),
    /// Hosted Postgres through PostgREST.
    Remote(RemoteConfig),
}

/// Opens the configured backend. Selection happens once, here.
pub async fn open_store(config: &StoreConfig) -> StoreResult<Arc<dyn InvoiceStore>> {
    let store: Arc<dyn InvoiceStore> = match config {
        StoreConfig::Embedded(db) => {
            let database = Database::new(db.clone()).await?;
            Arc::new(database.invoices())
        }
        StoreConfig::Remote(remote) => Arc::new(RestInvoiceStore::new(remote)?),
    };

    info!(backend = store.backend(), "Invoice store ready");
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_embedded_store() {
        let store = open_store(&StoreConfig::Embedded(DbConfig::in_memory()))
            .await
            .unwrap();
        assert_eq!(store.backend(), "sqlite");
        assert!(store.is_empty().await.unwrap());
    }

    #[tokio::test]
    async fn test_open_remote_store_is_lazy() {
        let config = RemoteConfig::new("http://127.0.0.1:1", "key");
        let store = open_store(&StoreConfig::Remote(config)).await.unwrap();
        assert_eq!(store.backend(), "remote");
    }
}
