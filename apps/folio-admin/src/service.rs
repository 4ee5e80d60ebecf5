//! # Invoice Service
//!
//! The orchestrator: every invoice operation goes through here.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  caller ──► require_admin ──► validate ──► calculate ──► InvoiceStore   │
//! │                 │                 │                          │          │
//! │             Forbidden        Validation              Store / NotFound   │
//! │                                                                         │
//! │  render: require_admin ──► get_by_id ──► folio_render (blocking pool)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service holds a store handle chosen at startup and never looks at
//! which backend it is talking to.

use chrono::Utc;
use folio_core::id::new_id;
use folio_core::summary::summarize;
use folio_core::validation::{validate_create, validate_patch};
use folio_core::{
    CreateInvoiceRequest, Invoice, InvoiceDefaults, PatchInvoiceRequest, INVOICE_ID_PREFIX,
};
use folio_db::InvoiceStore;
use folio_render::{render_invoice, RenderOptions};
use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::Caller;
use crate::error::{ServiceError, ServiceResult};

/// Content type of rendered documents.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered invoice, ready to hand to the caller.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Suggested download name, `{id}.pdf`.
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Invoice lifecycle operations.
#[derive(Clone)]
pub struct InvoiceService {
    store: Arc<dyn InvoiceStore>,
    defaults: InvoiceDefaults,
    render: RenderOptions,
}

impl InvoiceService {
    pub fn new(store: Arc<dyn InvoiceStore>, defaults: InvoiceDefaults, render: RenderOptions) -> Self {
        InvoiceService {
            store,
            defaults,
            render,
        }
    }

    /// The store this service writes to.
    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    /// Validates, totals and stores a new invoice. Returns its id.
    ///
    /// Client-submitted totals are ignored; only `taxPercent` and
    /// `discount` are taken from the request summary.
    pub async fn create(&self, caller: &Caller, request: &CreateInvoiceRequest) -> ServiceResult<String> {
        caller.require_admin()?;

        let draft = validate_create(request)?;
        let summary = summarize(
            &draft.lines,
            &draft.additional_charges,
            draft.effective_tax_percent(&self.defaults),
            draft.discount,
        );

        let id = new_id(INVOICE_ID_PREFIX);
        let invoice = draft.into_invoice(id.clone(), Utc::now(), summary, &self.defaults);
        self.store.insert(&invoice).await?;

        info!(id = %id, total = %invoice.summary.total, lines = invoice.lines.len(), "Invoice created");
        Ok(id)
    }

    /// All invoices, oldest first.
    pub async fn list(&self, caller: &Caller) -> ServiceResult<Vec<Invoice>> {
        caller.require_admin()?;
        let invoices = self.store.list().await?;
        debug!(count = invoices.len(), "Listed invoices");
        Ok(invoices)
    }

    pub async fn get(&self, caller: &Caller, id: &str) -> ServiceResult<Invoice> {
        caller.require_admin()?;
        self.store
            .get_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(id))
    }

    /// Applies the allow-listed fields. `Ok(true)` on success; a missing id
    /// is [`ServiceError::NotFound`].
    pub async fn patch(&self, caller: &Caller, id: &str, request: &PatchInvoiceRequest) -> ServiceResult<bool> {
        caller.require_admin()?;

        let patch = validate_patch(request)?;
        if !self.store.update(id, &patch).await? {
            return Err(ServiceError::not_found(id));
        }

        info!(id = %id, "Invoice updated");
        Ok(true)
    }

    /// Removes an invoice. `Ok(true)` on success; a missing id is
    /// [`ServiceError::NotFound`].
    pub async fn delete(&self, caller: &Caller, id: &str) -> ServiceResult<bool> {
        caller.require_admin()?;

        if !self.store.delete(id).await? {
            return Err(ServiceError::not_found(id));
        }

        info!(id = %id, "Invoice deleted");
        Ok(true)
    }

    /// Renders the stored invoice as a single-page PDF.
    pub async fn render(&self, caller: &Caller, id: &str) -> ServiceResult<RenderedDocument> {
        let invoice = self.get(caller, id).await?;
        let bytes = render_invoice(&invoice, &self.render).await?;

        debug!(id = %id, bytes = bytes.len(), "Invoice rendered");
        Ok(RenderedDocument {
            filename: format!("{id}.pdf"),
            content_type: PDF_CONTENT_TYPE,
            bytes,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
