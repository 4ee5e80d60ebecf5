//! # Domain Types
//!
//! The invoice document as it is stored and handed back to callers.
//!
//! ## Invoice Anatomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Invoice                                                                │
//! │  ├── id, createdAt                  (assigned once, immutable)          │
//! │  ├── client: ClientInfo             (billed-to block)                   │
//! │  ├── projectName / projectId / reference / invoiceDate / dueDate        │
//! │  ├── services: Vec<ServiceLine>     (ordered rows)                      │
//! │  ├── additionalCharges              (revision, express, add-ons)        │
//! │  ├── summary: Summary               (always computed server-side)       │
//! │  ├── currency                                                           │
//! │  ├── status == paymentStatus        (kept in lockstep)                  │
//! │  ├── paymentMethod, notes           (patchable)                         │
//! │  └── footer: Footer                 (business identity + terms)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! JSON uses camelCase and flattens the client block (`clientName`,
//! `clientEmail`, ...) so documents read the same as the admin panel's
//! payloads.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Payment Status
// =============================================================================

/// Payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Nothing received yet.
    #[default]
    Unpaid,
    /// Settled in full.
    Paid,
    /// Some money received.
    Partial,
}

impl PaymentStatus {
    /// Every accepted value, in wire form.
    pub const ALL: [&'static str; 3] = ["unpaid", "paid", "partial"];

    /// Wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unpaid" => Ok(PaymentStatus::Unpaid),
            "paid" => Ok(PaymentStatus::Paid),
            "partial" => Ok(PaymentStatus::Partial),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: PaymentStatus::ALL.iter().map(|s| s.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

/// Who the invoice is billed to.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ClientInfo {
    /// Client or company name. Never empty.
    #[serde(rename = "clientName")]
    pub name: String,
    #[serde(rename = "clientAddress")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// City / region line.
    #[serde(rename = "clientCity")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(rename = "clientEmail")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "clientPhone")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

// =============================================================================
// Service Line
// =============================================================================

/// One billable row.
///
/// `amount` is either the explicit amount given at creation or
/// `quantity × rate`; it is never rounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLine {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub quantity: Decimal,
    pub rate: Money,
    pub amount: Money,
}

impl ServiceLine {
    /// A line whose amount is `quantity × rate`.
    pub fn new(name: impl Into<String>, quantity: Decimal, rate: Money) -> Self {
        ServiceLine {
            name: name.into(),
            description: None,
            quantity,
            rate,
            amount: rate.times(quantity),
        }
    }
}

// =============================================================================
// Additional Charges
// =============================================================================

/// Flat charges added on top of the service lines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalCharges {
    pub extra_revision: Money,
    pub express_delivery: Money,
    pub addons_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addons_description: Option<String>,
}

impl AdditionalCharges {
    /// Sum of the numeric fields.
    pub fn total(&self) -> Money {
        self.extra_revision + self.express_delivery + self.addons_amount
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Derived monetary totals.
///
/// ## Invariants
/// - `subtotal` = Σ line amounts + Σ additional charges (exact)
/// - `tax_amount` = round2(subtotal × tax_percent / 100)
/// - `total` = max(0, round2(subtotal + tax_amount − discount))
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub subtotal: Money,
    #[serde(with = "rust_decimal::serde::float")]
    #[ts(type = "number")]
    pub tax_percent: Decimal,
    pub tax_amount: Money,
    pub discount: Money,
    pub total: Money,
}

// =============================================================================
// Footer
// =============================================================================

/// Business display block printed on the document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct Footer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Payment terms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terms: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_policy: Option<String>,
    /// `/uploads/...` path of the logo image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl Footer {
    /// Fills every empty field from `defaults`.
    pub fn or_defaults(self, defaults: &Footer) -> Footer {
        fn pick(own: Option<String>, fallback: &Option<String>) -> Option<String> {
            own.or_else(|| fallback.clone())
        }

        Footer {
            business_name: pick(self.business_name, &defaults.business_name),
            contact: pick(self.contact, &defaults.contact),
            address: pick(self.address, &defaults.address),
            city: pick(self.city, &defaults.city),
            tax_id: pick(self.tax_id, &defaults.tax_id),
            website: pick(self.website, &defaults.website),
            email: pick(self.email, &defaults.email),
            phone: pick(self.phone, &defaults.phone),
            terms: pick(self.terms, &defaults.terms),
            refund_policy: pick(self.refund_policy, &defaults.refund_policy),
            logo_url: pick(self.logo_url, &defaults.logo_url),
        }
    }
}

// =============================================================================
// Invoice
// =============================================================================

/// A billing document issued to one client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Opaque, globally unique (`inv_…`).
    pub id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub client: ClientInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Printed as the invoice number when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Display string, not parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,
    /// Display string, not parsed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(rename = "services")]
    pub lines: Vec<ServiceLine>,
    #[serde(default)]
    pub additional_charges: AdditionalCharges,
    pub summary: Summary,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_status: PaymentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub footer: Footer,
}

impl Invoice {
    /// Sets both status fields at once.
    pub fn set_payment_status(&mut self, status: PaymentStatus) {
        self.status = status;
        self.payment_status = status;
    }

    /// Number printed in the metadata column.
    pub fn invoice_number(&self) -> &str {
        self.project_id.as_deref().unwrap_or(&self.id)
    }
}

// =============================================================================
// Defaults
// =============================================================================

/// Business-identity defaults merged into an invoice when the request
/// leaves them out. Supplied by configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDefaults {
    pub currency: String,
    pub tax_percent: Decimal,
    pub footer: Footer,
}

impl Default for InvoiceDefaults {
    fn default() -> Self {
        InvoiceDefaults {
            currency: crate::DEFAULT_CURRENCY.to_string(),
            tax_percent: Decimal::from(10),
            footer: Footer::default(),
        }
    }
}

// =============================================================================
// Patch
// =============================================================================

/// The mutable subset of an invoice, already validated.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    /// `Some("")` clears the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// `Some("")` clears the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InvoicePatch {
    /// True when applying the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.payment_status.is_none() && self.payment_method.is_none() && self.notes.is_none()
    }

    /// Merges the patch into `invoice` and recomputes its summary from the
    /// stored lines. Lines, ids and timestamps are never touched.
    pub fn apply_to(&self, invoice: &mut Invoice) {
        if let Some(status) = self.payment_status {
            invoice.set_payment_status(status);
        }
        if let Some(method) = &self.payment_method {
            invoice.payment_method = non_empty(method);
        }
        if let Some(notes) = &self.notes {
            invoice.notes = non_empty(notes);
        }
        // A no-op for documents already totalled by `summarize`; an imported
        // or hand-edited document gets its `total` column realigned.
        invoice.summary = crate::summary::summarize(
            &invoice.lines,
            &invoice.additional_charges,
            invoice.summary.tax_percent,
            invoice.summary.discount,
        );
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
