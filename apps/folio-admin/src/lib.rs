//! # folio-admin
//!
//! Wires configuration, the invoice store and the renderer into an
//! [`InvoiceService`], and exposes it through the `folio-admin` binary.
//!
//! ## Module Organization
//! ```text
//! folio_admin/
//! ├── lib.rs          ◄─── You are here (startup wiring, logging)
//! ├── config.rs       ◄─── folio.toml + environment overrides
//! ├── auth.rs         ◄─── admin JWT → Caller
//! ├── service.rs      ◄─── InvoiceService (create/list/get/patch/delete/render)
//! ├── error.rs        ◄─── ServiceError → ApiError
//! └── cli.rs          ◄─── clap definitions for the binary
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing        RUST_LOG or "info,folio=debug,sqlx=warn"        │
//! │  2. AppConfig::load     file → env overrides → validate                 │
//! │  3. open_store          embedded SQLite or remote PostgREST             │
//! │  4. startup migration   legacy snapshot → store (failures only logged)  │
//! │  5. InvoiceService      store handle injected, no globals               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod service;

use folio_db::{migrate_legacy_snapshot, open_store, InvoiceStore, StoreResult};
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use auth::{Caller, TokenVerifier};
pub use config::AppConfig;
pub use error::{ApiError, ErrorCode, ServiceError, ServiceResult};
pub use service::{InvoiceService, RenderedDocument};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,folio=debug,sqlx=warn";

/// Initializes the global tracing subscriber.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Imports the legacy snapshot if the store is still empty.
///
/// Never fails: an unreadable snapshot or a store error is logged and the
/// process carries on with whatever the store already holds.
pub async fn run_startup_migration(store: &dyn InvoiceStore, snapshot: &Path) -> usize {
    match migrate_legacy_snapshot(store, snapshot).await {
        Ok(0) => 0,
        Ok(imported) => {
            info!(imported, path = %snapshot.display(), "Imported legacy invoices");
            imported
        }
        Err(err) => {
            warn!(error = %err, path = %snapshot.display(), "Legacy snapshot migration failed, continuing");
            0
        }
    }
}

/// Opens the configured store, runs the startup migration and builds the
/// service.
pub async fn bootstrap(config: &AppConfig) -> StoreResult<InvoiceService> {
    let store = open_store(&config.store_config()).await?;
    run_startup_migration(store.as_ref(), &config.store.snapshot_path).await;

    Ok(InvoiceService::new(
        store,
        config.invoice_defaults(),
        config.render_options(),
    ))
}
