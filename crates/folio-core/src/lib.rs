//! # folio-core: Pure Invoice Logic
//!
//! The invoice data model, money arithmetic, request validation and
//! identifier generation. Nothing in this crate performs I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Invoice Lifecycle                                  │
//! │                                                                         │
//! │  CreateInvoiceRequest                                                   │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ folio-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   validation ──► summary ──► id ──► Invoice                     │   │
//! │  │   (strict)      (Money)     (inv_…)                             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │            ┌───────────────────┴───────────────────┐                    │
//! │            ▼                                       ▼                    │
//! │   folio-db (InvoiceStore)               folio-render (PDF)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Invoice, ServiceLine, Summary, Footer, InvoicePatch
//! - [`money`] - Money type over exact decimals
//! - [`summary`] - line amounts and invoice totals
//! - [`request`] - strict inbound payload shapes
//! - [`validation`] - request validation into drafts and patches
//! - [`id`] - collision-resistant invoice identifiers
//! - [`error`] - validation errors
//!
//! ## Example Usage
//!
//! ```rust
//! use folio_core::money::Money;
//! use folio_core::summary::summarize;
//! use folio_core::types::{AdditionalCharges, ServiceLine};
//! use rust_decimal::Decimal;
//!
//! let lines = vec![ServiceLine::new("Video edit", Decimal::from(2), Money::from_major(150))];
//! let summary = summarize(&lines, &AdditionalCharges::default(), Decimal::from(10), Money::zero());
//!
//! assert_eq!(summary.subtotal, Money::from_major(300));
//! assert_eq!(summary.tax_amount, Money::from_major(30));
//! assert_eq!(summary.total, Money::from_major(330));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod id;
pub mod money;
pub mod request;
pub mod summary;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::ValidationError;
pub use money::Money;
pub use request::{CreateInvoiceRequest, PatchInvoiceRequest};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix for every invoice identifier (`inv_…`).
pub const INVOICE_ID_PREFIX: &str = "inv";

/// Days added to the invoice date when no due date was given.
pub const DEFAULT_DUE_DAYS: i64 = 15;

/// Currency shown when neither the request nor configuration supplies one.
pub const DEFAULT_CURRENCY: &str = "US$";

/// Maximum service lines accepted on one invoice.
///
/// ## Business Reason
/// Bounds the stored document size. Rendering caps visible rows far lower;
/// the remaining lines still count toward the summary.
pub const MAX_SERVICE_LINES: usize = 200;

/// Upper bound for `taxPercent`.
pub const MAX_TAX_PERCENT: i64 = 100;
