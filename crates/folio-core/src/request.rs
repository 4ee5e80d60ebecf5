//! # Request Payloads
//!
//! Inbound shapes for invoice creation and patching, exactly as the admin
//! panel posts them. Unknown fields are rejected at parse time; every other
//! rule lives in [`crate::validation`].
//!
//! ```rust
//! use folio_core::request::CreateInvoiceRequest;
//!
//! let ok = CreateInvoiceRequest::from_json(r#"{"clientName":"Acme","services":[]}"#);
//! assert!(ok.is_ok());
//!
//! let unknown = CreateInvoiceRequest::from_json(r#"{"clientName":"Acme","isAdmin":true}"#);
//! assert!(unknown.is_err());
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

// =============================================================================
// Numeric Input
// =============================================================================

/// A number as sent by a form: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        NumericInput::Number(value)
    }
}

// =============================================================================
// Creation
// =============================================================================

/// One service row of a creation payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ServiceLineRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<NumericInput>,
    #[serde(default)]
    pub rate: Option<NumericInput>,
    #[serde(default)]
    pub amount: Option<NumericInput>,
}

/// Additional charges block of a creation payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AdditionalChargesRequest {
    #[serde(default)]
    pub extra_revision: Option<NumericInput>,
    #[serde(default)]
    pub express_delivery: Option<NumericInput>,
    #[serde(default)]
    pub addons_amount: Option<NumericInput>,
    #[serde(default)]
    pub addons_description: Option<String>,
}

/// Summary block of a creation payload.
///
/// Only `tax_percent` and `discount` are read; `subtotal`, `tax_amount` and
/// `total` are accepted so panel payloads parse, then recomputed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SummaryRequest {
    #[serde(default)]
    pub subtotal: Option<NumericInput>,
    #[serde(default)]
    pub tax_percent: Option<NumericInput>,
    #[serde(default)]
    pub tax_amount: Option<NumericInput>,
    #[serde(default)]
    pub discount: Option<NumericInput>,
    #[serde(default)]
    pub total: Option<NumericInput>,
}

/// Footer block of a creation payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct FooterRequest {
    pub business_name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub tax_id: Option<String>,
    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub terms: Option<String>,
    pub refund_policy: Option<String>,
    pub logo_url: Option<String>,
}

/// Invoice creation payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct CreateInvoiceRequest {
    pub client_name: Option<String>,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_address: Option<String>,
    pub client_city: Option<String>,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub reference: Option<String>,
    pub invoice_date: Option<String>,
    pub due_date: Option<String>,
    #[serde(alias = "lines")]
    pub services: Vec<ServiceLineRequest>,
    pub additional_charges: Option<AdditionalChargesRequest>,
    pub summary: Option<SummaryRequest>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub footer: Option<FooterRequest>,
}

impl CreateInvoiceRequest {
    /// Parses a JSON payload, rejecting unknown fields.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json).map_err(ValidationError::from)
    }
}

// =============================================================================
// Patch
// =============================================================================

/// Invoice patch payload. Strict allow-list: anything else fails to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", deny_unknown_fields, default)]
pub struct PatchInvoiceRequest {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

impl PatchInvoiceRequest {
    /// Parses a JSON payload, rejecting unknown fields.
    pub fn from_json(json: &str) -> ValidationResult<Self> {
        serde_json::from_str(json).map_err(ValidationError::from)
    }
}
