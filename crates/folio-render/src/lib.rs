//! # folio-render: Single-Page Invoice Documents
//!
//! Renders a stored [`Invoice`] as a one-page A4 PDF.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  render_invoice(&invoice, &options)                                     │
//! │       │  clone + spawn_blocking                                         │
//! │       ▼                                                                 │
//! │  logo::load_logo      ← optional, failures mean "no logo"               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  layout::layout_invoice ← pure; caps rows, recomputes totals,           │
//! │       │                   rejects anything off the page                 │
//! │       ▼                                                                 │
//! │  pdf::write_pdf        ← printpdf, built-in Helvetica                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Vec<u8> (complete document) or RenderError                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rendering never mutates the invoice and keeps no state between calls.

use folio_core::Invoice;
use std::path::PathBuf;
use tracing::debug;

pub mod error;
pub mod layout;
pub mod logo;
pub mod metrics;
pub mod pdf;

pub use error::{RenderError, RenderResult};
pub use layout::{layout_invoice, LayoutOptions, PageLayout, DEFAULT_MAX_ROWS};

/// Everything the renderer needs besides the invoice.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub layout: LayoutOptions,
    /// Directory that `/uploads/...` logo URLs resolve into.
    pub uploads_dir: Option<PathBuf>,
    /// Logo used when the invoice has none (or it can't be loaded).
    pub fallback_logo: Option<PathBuf>,
}

/// Renders on the calling thread.
pub fn render_invoice_blocking(invoice: &Invoice, options: &RenderOptions) -> RenderResult<Vec<u8>> {
    let logo_url = invoice
        .footer
        .logo_url
        .as_deref()
        .or(options.layout.business.logo_url.as_deref());
    let logo = logo::load_logo(
        logo_url,
        options.uploads_dir.as_deref(),
        options.fallback_logo.as_deref(),
    );

    let page = layout_invoice(
        invoice,
        &options.layout,
        logo.as_ref().map(|l| (l.width_px, l.height_px)),
    )?;

    debug!(
        id = %invoice.id,
        visible_rows = page.visible_rows,
        truncated_rows = page.truncated_rows,
        logo = logo.is_some(),
        "Invoice laid out"
    );

    let title = metrics::sanitize(&format!("Invoice {}", invoice.invoice_number()));
    pdf::write_pdf(&page, &title, logo.as_ref())
}

/// Renders on the blocking pool so async callers are not stalled.
///
/// A panic inside the renderer surfaces as [`RenderError::Panicked`].
pub async fn render_invoice(invoice: &Invoice, options: &RenderOptions) -> RenderResult<Vec<u8>> {
    let invoice = invoice.clone();
    let options = options.clone();

    tokio::task::spawn_blocking(move || render_invoice_blocking(&invoice, &options))
        .await
        .map_err(|e| RenderError::Panicked(e.to_string()))?
}
