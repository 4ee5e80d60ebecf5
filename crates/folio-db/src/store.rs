//! # InvoiceStore Contract
//!
//! The single interface every backend implements. Orchestration code holds
//! an `Arc<dyn InvoiceStore>` and never names a concrete backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       dyn InvoiceStore                                  │
//! │                                                                         │
//! │   insert ─ get_by_id ─ list ─ update ─ delete ─ is_empty ─ insert_many │
//! │                                                                         │
//! │        ┌────────────────────────┐      ┌────────────────────────┐       │
//! │        │  InvoiceRepository     │      │  RestInvoiceStore      │       │
//! │        │  SQLite file, WAL      │      │  PostgREST over HTTPS  │       │
//! │        │  writes serialized     │      │  last write wins       │       │
//! │        └────────────────────────┘      └────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use chrono::SecondsFormat;
use folio_core::{Invoice, InvoicePatch, PaymentStatus};
use serde::Serialize;

use crate::error::{StoreError, StoreResult};

// =============================================================================
// Trait
// =============================================================================

/// Persistence contract for invoices.
///
/// Both backends must be indistinguishable to callers:
/// - `list` is ordered by `createdAt` ascending (ties by id)
/// - `update` returns `false` when the id does not exist
/// - `delete` returns `true` once, then `false`
/// - callers always receive owned copies
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Short backend name for logs (`"sqlite"`, `"remote"`).
    fn backend(&self) -> &'static str;

    /// Stores a new invoice. Fails with [`StoreError::Duplicate`] if the id exists.
    async fn insert(&self, invoice: &Invoice) -> StoreResult<()>;

    /// Fetches one invoice.
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Invoice>>;

    /// Every invoice, oldest first. Rows whose document no longer decodes are
    /// skipped with a warning.
    async fn list(&self) -> StoreResult<Vec<Invoice>>;

    /// Merges `patch` into the stored document and refreshes the
    /// denormalized columns.
    async fn update(&self, id: &str, patch: &InvoicePatch) -> StoreResult<bool>;

    /// Removes an invoice. Unconditional and irreversible.
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    /// True when the store holds zero rows.
    async fn is_empty(&self) -> StoreResult<bool>;

    /// Bulk import that ignores ids already present. Returns rows inserted.
    async fn insert_many(&self, invoices: &[Invoice]) -> StoreResult<usize>;
}

// =============================================================================
// Row Layout
// =============================================================================

/// The persisted row: denormalized scalars plus the verbatim document.
///
/// Field names are the column names of both the SQLite table and the remote
/// table, so this serializes straight into a PostgREST insert body.
#[derive(Debug, Clone, Serialize)]
pub struct InvoiceRow {
    pub id: String,
    /// Fixed-width RFC 3339, e.g. `2024-03-01T10:00:00.000Z`.
    pub created_at: String,
    pub status: PaymentStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub currency: String,
    pub total: f64,
    pub data: serde_json::Value,
}

impl InvoiceRow {
    /// Builds the row for an invoice.
    pub fn from_invoice(invoice: &Invoice) -> StoreResult<Self> {
        let data = serde_json::to_value(invoice)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        Ok(InvoiceRow {
            id: invoice.id.clone(),
            created_at: sortable_timestamp(invoice),
            status: invoice.status,
            payment_status: invoice.payment_status,
            payment_method: invoice.payment_method.clone(),
            currency: invoice.currency.clone(),
            total: invoice.summary.total.to_f64(),
            data,
        })
    }

    /// The document as a JSON string, for TEXT columns.
    pub fn data_text(&self) -> String {
        self.data.to_string()
    }
}

/// Fixed-width UTC timestamp whose text order is time order.
pub fn sortable_timestamp(invoice: &Invoice) -> String {
    invoice
        .created_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Decodes a stored JSON document.
pub fn decode_document(id: &str, data: &str) -> StoreResult<Invoice> {
    serde_json::from_str(data).map_err(|e| StoreError::Corrupt {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

/// Decodes a stored JSON document that arrived already parsed.
pub fn decode_value(id: &str, data: serde_json::Value) -> StoreResult<Invoice> {
    serde_json::from_value(data).map_err(|e| StoreError::Corrupt {
        id: id.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{Duration, TimeZone, Utc};
    use folio_core::summary::summarize;
    use folio_core::{AdditionalCharges, ClientInfo, Footer, Invoice, Money, PaymentStatus, ServiceLine};
    use rust_decimal::Decimal;

    /// An invoice created `minutes` after a fixed instant.
    pub fn invoice(id: &str, minutes: i64) -> Invoice {
        let lines = vec![ServiceLine::new("Video edit", Decimal::from(2), Money::from_major(150))];
        let charges = AdditionalCharges::default();
        let summary = summarize(&lines, &charges, Decimal::from(10), Money::zero());
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();

        Invoice {
            id: id.to_string(),
            created_at: base + Duration::minutes(minutes),
            client: ClientInfo {
                name: "Acme Co".to_string(),
                email: Some("billing@acme.test".to_string()),
                ..ClientInfo::default()
            },
            project_name: Some("Launch film".to_string()),
            project_id: None,
            reference: None,
            invoice_date: None,
            due_date: None,
            lines,
            additional_charges: charges,
            summary,
            currency: "US$".to_string(),
            status: PaymentStatus::Unpaid,
            payment_status: PaymentStatus::Unpaid,
            payment_method: None,
            notes: None,
            footer: Footer::default(),
        }
    }
}
