//! # Validation Module
//!
//! Turns inbound payloads into trusted values.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Parsing (serde, request.rs)                                   │
//! │  ├── Unknown fields rejected                                            │
//! │  └── Wrong JSON types rejected                                          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Trim + length caps on every text field                             │
//! │  ├── Numbers: finite, non-negative, bounded                             │
//! │  ├── Empty service rows dropped, at least one named row kept            │
//! │  └── status / paymentStatus resolved to one value                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Store (NOT NULL, PRIMARY KEY)                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use folio_core::request::{CreateInvoiceRequest, ServiceLineRequest};
//! use folio_core::validation::validate_create;
//!
//! let request = CreateInvoiceRequest {
//!     client_name: Some("Acme Co".to_string()),
//!     services: vec![ServiceLineRequest {
//!         name: Some("Video edit".to_string()),
//!         quantity: Some(2.0.into()),
//!         rate: Some(150.0.into()),
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//!
//! let draft = validate_create(&request).unwrap();
//! assert_eq!(draft.lines[0].amount.to_string(), "300.00");
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::request::{
    AdditionalChargesRequest, CreateInvoiceRequest, FooterRequest, NumericInput,
    PatchInvoiceRequest, ServiceLineRequest,
};
use crate::summary::line_amount;
use crate::types::{
    AdditionalCharges, ClientInfo, Footer, Invoice, InvoiceDefaults, InvoicePatch, PaymentStatus,
    ServiceLine, Summary,
};
use crate::{MAX_SERVICE_LINES, MAX_TAX_PERCENT};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Largest accepted value for any numeric field.
///
/// Keeps `quantity × rate` summed over every line far inside decimal range.
pub const MAX_NUMERIC_INPUT: i64 = 1_000_000_000_000;

// =============================================================================
// Draft
// =============================================================================

/// A validated creation request, before id, timestamp and summary exist.
#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceDraft {
    pub client: ClientInfo,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub reference: Option<String>,
    pub invoice_date: Option<String>,
    pub due_date: Option<String>,
    pub lines: Vec<ServiceLine>,
    pub additional_charges: AdditionalCharges,
    /// `None` means "use the configured default".
    pub tax_percent: Option<Decimal>,
    pub discount: Money,
    /// `None` means "use the configured default".
    pub currency: Option<String>,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
    pub footer: Footer,
}

impl InvoiceDraft {
    /// Tax percent to feed the calculator.
    pub fn effective_tax_percent(&self, defaults: &InvoiceDefaults) -> Decimal {
        self.tax_percent.unwrap_or(defaults.tax_percent)
    }

    /// Assembles the stored invoice.
    pub fn into_invoice(
        self,
        id: String,
        created_at: DateTime<Utc>,
        summary: Summary,
        defaults: &InvoiceDefaults,
    ) -> Invoice {
        Invoice {
            id,
            created_at,
            client: self.client,
            project_name: self.project_name,
            project_id: self.project_id,
            reference: self.reference,
            invoice_date: self.invoice_date,
            due_date: self.due_date,
            lines: self.lines,
            additional_charges: self.additional_charges,
            summary,
            currency: self.currency.unwrap_or_else(|| defaults.currency.clone()),
            status: self.payment_status,
            payment_status: self.payment_status,
            payment_method: self.payment_method,
            notes: self.notes,
            footer: self.footer.or_defaults(&defaults.footer),
        }
    }
}

// =============================================================================
// Creation
// =============================================================================

/// Validates an invoice creation payload.
///
/// ## Rules
/// - `clientName` non-empty, at most 200 characters
/// - service rows with neither name nor description are dropped; a row with
///   a description but no name is an error; zero remaining rows is an error
/// - numbers are finite, non-negative and at most [`MAX_NUMERIC_INPUT`]
/// - `taxPercent` within `[0, 100]`
/// - `status` / `paymentStatus` in `{unpaid, paid, partial}` and agreeing
///   when both are present
/// - every free-text field trimmed and length-capped
///
/// Client contact fields (`clientEmail`, `clientPhone`) are free text; only
/// their length is checked.
pub fn validate_create(request: &CreateInvoiceRequest) -> ValidationResult<InvoiceDraft> {
    let client = ClientInfo {
        name: required_text(request.client_name.as_deref(), "clientName", 200)?,
        email: text(request.client_email.as_deref(), "clientEmail", 200)?,
        phone: text(request.client_phone.as_deref(), "clientPhone", 80)?,
        address: text(request.client_address.as_deref(), "clientAddress", 240)?,
        city: text(request.client_city.as_deref(), "clientCity", 140)?,
    };

    let lines = validate_lines(&request.services)?;
    let additional_charges = validate_charges(request.additional_charges.as_ref())?;

    let (tax_percent, discount) = match &request.summary {
        Some(summary) => (
            tax_percent(summary.tax_percent.as_ref())?,
            money(summary.discount.as_ref(), "summary.discount")?.unwrap_or_default(),
        ),
        None => (None, Money::zero()),
    };

    let payment_status = resolve_status(request.status.as_deref(), request.payment_status.as_deref())?
        .unwrap_or_default();

    Ok(InvoiceDraft {
        client,
        project_name: text(request.project_name.as_deref(), "projectName", 200)?,
        project_id: text(request.project_id.as_deref(), "projectId", 80)?,
        reference: text(request.reference.as_deref(), "reference", 80)?,
        invoice_date: text(request.invoice_date.as_deref(), "invoiceDate", 80)?,
        due_date: text(request.due_date.as_deref(), "dueDate", 80)?,
        lines,
        additional_charges,
        tax_percent,
        discount,
        currency: text(request.currency.as_deref(), "currency", 10)?,
        payment_status,
        payment_method: text(request.payment_method.as_deref(), "paymentMethod", 80)?,
        notes: text(request.notes.as_deref(), "notes", 1200)?,
        footer: validate_footer(request.footer.as_ref())?,
    })
}

fn validate_lines(rows: &[ServiceLineRequest]) -> ValidationResult<Vec<ServiceLine>> {
    if rows.len() > MAX_SERVICE_LINES {
        return Err(ValidationError::TooMany {
            field: "services".to_string(),
            max: MAX_SERVICE_LINES,
        });
    }

    let mut lines = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let field = |name: &str| format!("services[{index}].{name}");

        let name = text(row.name.as_deref(), &field("name"), 120)?;
        let description = text(row.description.as_deref(), &field("description"), 800)?;

        let name = match (name, &description) {
            (Some(name), _) => name,
            (None, None) => continue,
            (None, Some(_)) => return Err(ValidationError::required(field("name"))),
        };

        let quantity = number(row.quantity.as_ref(), &field("quantity"))?.unwrap_or_default();
        let rate = money(row.rate.as_ref(), &field("rate"))?.unwrap_or_default();
        let explicit = money(row.amount.as_ref(), &field("amount"))?;

        lines.push(ServiceLine {
            name,
            description,
            quantity,
            rate,
            amount: line_amount(quantity, rate, explicit),
        });
    }

    if lines.is_empty() {
        return Err(ValidationError::NoLineItems);
    }
    Ok(lines)
}

fn validate_charges(charges: Option<&AdditionalChargesRequest>) -> ValidationResult<AdditionalCharges> {
    let Some(charges) = charges else {
        return Ok(AdditionalCharges::default());
    };

    Ok(AdditionalCharges {
        extra_revision: money(charges.extra_revision.as_ref(), "additionalCharges.extraRevision")?
            .unwrap_or_default(),
        express_delivery: money(charges.express_delivery.as_ref(), "additionalCharges.expressDelivery")?
            .unwrap_or_default(),
        addons_amount: money(charges.addons_amount.as_ref(), "additionalCharges.addonsAmount")?
            .unwrap_or_default(),
        addons_description: text(
            charges.addons_description.as_deref(),
            "additionalCharges.addonsDescription",
            300,
        )?,
    })
}

fn validate_footer(footer: Option<&FooterRequest>) -> ValidationResult<Footer> {
    let Some(footer) = footer else {
        return Ok(Footer::default());
    };

    Ok(Footer {
        business_name: text(footer.business_name.as_deref(), "footer.businessName", 200)?,
        contact: text(footer.contact.as_deref(), "footer.contact", 300)?,
        address: text(footer.address.as_deref(), "footer.address", 240)?,
        city: text(footer.city.as_deref(), "footer.city", 140)?,
        tax_id: text(footer.tax_id.as_deref(), "footer.taxId", 80)?,
        website: text(footer.website.as_deref(), "footer.website", 120)?,
        email: text(footer.email.as_deref(), "footer.email", 120)?,
        phone: text(footer.phone.as_deref(), "footer.phone", 80)?,
        terms: text(footer.terms.as_deref(), "footer.terms", 2000)?,
        refund_policy: text(footer.refund_policy.as_deref(), "footer.refundPolicy", 2000)?,
        logo_url: text(footer.logo_url.as_deref(), "footer.logoUrl", 500)?,
    })
}

fn tax_percent(value: Option<&NumericInput>) -> ValidationResult<Option<Decimal>> {
    let percent = number(value, "summary.taxPercent")?;
    if let Some(percent) = percent {
        if percent > Decimal::from(MAX_TAX_PERCENT) {
            return Err(ValidationError::OutOfRange {
                field: "summary.taxPercent".to_string(),
                min: 0,
                max: MAX_TAX_PERCENT,
            });
        }
    }
    Ok(percent)
}

// =============================================================================
// Patch
// =============================================================================

/// Validates an invoice patch payload.
///
/// ## Rules
/// - only `status`, `paymentStatus`, `paymentMethod`, `notes` exist
///   (anything else already failed to parse)
/// - statuses in the enum and agreeing when both are present
/// - `paymentMethod` at most 80 characters, `notes` at most 1200; an empty
///   string clears the field
pub fn validate_patch(request: &PatchInvoiceRequest) -> ValidationResult<InvoicePatch> {
    let payment_status = resolve_status(request.status.as_deref(), request.payment_status.as_deref())?;

    let payment_method = request
        .payment_method
        .as_deref()
        .map(|m| capped(m, "paymentMethod", 80))
        .transpose()?;
    let notes = request
        .notes
        .as_deref()
        .map(|n| capped(n, "notes", 1200))
        .transpose()?;

    Ok(InvoicePatch {
        payment_status,
        payment_method,
        notes,
    })
}

// =============================================================================
// Field Helpers
// =============================================================================

/// Trims and caps; returns the trimmed string, possibly empty.
fn capped(value: &str, field: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();
    if value.chars().count() > max {
        return Err(ValidationError::too_long(field, max));
    }
    Ok(value.to_string())
}

/// Optional text: trimmed, empty becomes `None`.
fn text(value: Option<&str>, field: &str, max: usize) -> ValidationResult<Option<String>> {
    match value {
        Some(value) => {
            let value = capped(value, field, max)?;
            Ok(if value.is_empty() { None } else { Some(value) })
        }
        None => Ok(None),
    }
}

fn required_text(value: Option<&str>, field: &str, max: usize) -> ValidationResult<String> {
    text(value, field, max)?.ok_or_else(|| ValidationError::required(field))
}

/// Coerces a form number. Empty strings count as absent.
fn number(value: Option<&NumericInput>, field: &str) -> ValidationResult<Option<Decimal>> {
    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
    };

    let parsed = match value {
        None => return Ok(None),
        Some(NumericInput::Number(n)) => {
            if !n.is_finite() {
                return Err(invalid());
            }
            Decimal::from_f64(*n).ok_or_else(invalid)?
        }
        Some(NumericInput::Text(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            match Decimal::from_str(s) {
                Ok(d) => d,
                Err(_) => s
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .and_then(Decimal::from_f64)
                    .ok_or_else(invalid)?,
            }
        }
    };

    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    if parsed > Decimal::from(MAX_NUMERIC_INPUT) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: MAX_NUMERIC_INPUT,
        });
    }
    Ok(Some(parsed))
}

fn money(value: Option<&NumericInput>, field: &str) -> ValidationResult<Option<Money>> {
    Ok(number(value, field)?.map(Money::from_decimal))
}

fn parse_status(value: Option<&str>, field: &str) -> ValidationResult<Option<PaymentStatus>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<PaymentStatus>().map(Some).map_err(|_| ValidationError::NotAllowed {
            field: field.to_string(),
            allowed: PaymentStatus::ALL.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

/// `status` and `paymentStatus` collapse to one value.
fn resolve_status(status: Option<&str>, payment_status: Option<&str>) -> ValidationResult<Option<PaymentStatus>> {
    let status = parse_status(status, "status")?;
    let payment_status = parse_status(payment_status, "paymentStatus")?;

    match (status, payment_status) {
        (Some(a), Some(b)) if a != b => Err(ValidationError::Conflict {
            field: "status".to_string(),
            other: "paymentStatus".to_string(),
        }),
        (a, b) => Ok(a.or(b)),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::SummaryRequest;

    fn named_line(name: &str, quantity: f64, rate: f64) -> ServiceLineRequest {
        ServiceLineRequest {
            name: Some(name.to_string()),
            quantity: Some(quantity.into()),
            rate: Some(rate.into()),
            ..Default::default()
        }
    }

    fn base_request() -> CreateInvoiceRequest {
        CreateInvoiceRequest {
            client_name: Some("Acme Co".to_string()),
            services: vec![named_line("Video edit", 2.0, 150.0)],
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_request() {
        let draft = validate_create(&base_request()).unwrap();
        assert_eq!(draft.client.name, "Acme Co");
        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].amount, Money::from_major(300));
        assert_eq!(draft.payment_status, PaymentStatus::Unpaid);
        assert_eq!(draft.tax_percent, None);
        assert_eq!(draft.currency, None);
    }

    #[test]
    fn test_client_name_required() {
        let mut request = base_request();
        request.client_name = Some("   ".to_string());
        assert_eq!(
            validate_create(&request).unwrap_err(),
            ValidationError::required("clientName")
        );
    }

    #[test]
    fn test_client_email_is_free_text() {
        let mut request = base_request();
        request.client_email = Some(" not-an-email ".to_string());
        let draft = validate_create(&request).unwrap();
        assert_eq!(draft.client.email.as_deref(), Some("not-an-email"));

        request.client_email = Some("a".repeat(201));
        assert_eq!(
            validate_create(&request).unwrap_err(),
            ValidationError::too_long("clientEmail", 200)
        );
    }

    #[test]
    fn test_client_name_cap() {
        let mut request = base_request();
        request.client_name = Some("A".repeat(201));
        assert_eq!(
            validate_create(&request).unwrap_err(),
            ValidationError::too_long("clientName", 200)
        );

        request.client_name = Some("A".repeat(200));
        assert!(validate_create(&request).is_ok());
    }

    #[test]
    fn test_empty_rows_dropped() {
        let mut request = base_request();
        request.services.insert(0, ServiceLineRequest::default());
        request.services.push(ServiceLineRequest {
            name: Some("  ".to_string()),
            description: Some("".to_string()),
            ..Default::default()
        });

        let draft = validate_create(&request).unwrap();
        assert_eq!(draft.lines.len(), 1);
        assert_eq!(draft.lines[0].name, "Video edit");
    }

    #[test]
    fn test_all_rows_empty_is_rejected() {
        let mut request = base_request();
        request.services = vec![ServiceLineRequest::default(), ServiceLineRequest::default()];
        assert_eq!(validate_create(&request).unwrap_err(), ValidationError::NoLineItems);

        request.services.clear();
        assert_eq!(validate_create(&request).unwrap_err(), ValidationError::NoLineItems);
    }

    #[test]
    fn test_description_without_name_is_rejected() {
        let mut request = base_request();
        request.services.push(ServiceLineRequest {
            description: Some("B-roll".to_string()),
            ..Default::default()
        });
        assert_eq!(
            validate_create(&request).unwrap_err(),
            ValidationError::required("services[1].name")
        );
    }

    #[test]
    fn test_negative_numbers_rejected() {
        let mut request = base_request();
        request.services[0].rate = Some((-1.0).into());
        assert_eq!(
            validate_create(&request).unwrap_err(),
            ValidationError::Negative {
                field: "services[0].rate".to_string()
            }
        );
    }

    #[test]
    fn test_numeric_strings_coerced() {
        let mut request = base_request();
        request.services[0].quantity = Some(NumericInput::Text(" 1.5 ".to_string()));
        request.services[0].rate = Some(NumericInput::Text("37.25".to_string()));

        let draft = validate_create(&request).unwrap();
        assert_eq!(draft.lines[0].amount.amount(), Decimal::new(55875, 3));
    }

    #[test]
    fn test_garbage_number_rejected() {
        let mut request = base_request();
        request.services[0].quantity = Some(NumericInput::Text("two".to_string()));
        assert!(matches!(
            validate_create(&request).unwrap_err(),
            ValidationError::InvalidNumber { .. }
        ));
    }

    #[test]
    fn test_explicit_amount_wins() {
        let mut request = base_request();
        request.services[0].amount = Some(250.0.into());
        let draft = validate_create(&request).unwrap();
        assert_eq!(draft.lines[0].amount, Money::from_major(250));
    }

    #[test]
    fn test_tax_percent_range() {
        let mut request = base_request();
        request.summary = Some(SummaryRequest {
            tax_percent: Some(100.5.into()),
            ..Default::default()
        });
        assert!(matches!(
            validate_create(&request).unwrap_err(),
            ValidationError::OutOfRange { .. }
        ));

        request.summary = Some(SummaryRequest {
            tax_percent: Some(18.0.into()),
            discount: Some(5.0.into()),
            total: Some(99999.0.into()),
            ..Default::default()
        });
        let draft = validate_create(&request).unwrap();
        assert_eq!(draft.tax_percent, Some(Decimal::from(18)));
        assert_eq!(draft.discount, Money::from_major(5));
    }

    #[test]
    fn test_status_resolution() {
        let mut request = base_request();
        request.payment_status = Some("paid".to_string());
        assert_eq!(validate_create(&request).unwrap().payment_status, PaymentStatus::Paid);

        request.status = Some("partial".to_string());
        assert_eq!(
            validate_create(&request).unwrap_err(),
            ValidationError::Conflict {
                field: "status".to_string(),
                other: "paymentStatus".to_string()
            }
        );

        request.status = Some("void".to_string());
        assert!(matches!(
            validate_create(&request).unwrap_err(),
            ValidationError::NotAllowed { .. }
        ));
    }

    #[test]
    fn test_too_many_lines() {
        let mut request = base_request();
        request.services = (0..=MAX_SERVICE_LINES).map(|i| named_line(&format!("L{i}"), 1.0, 1.0)).collect();
        assert!(matches!(
            validate_create(&request).unwrap_err(),
            ValidationError::TooMany { .. }
        ));
    }

    #[test]
    fn test_footer_caps() {
        let mut request = base_request();
        request.footer = Some(FooterRequest {
            terms: Some("x".repeat(2001)),
            ..Default::default()
        });
        assert_eq!(
            validate_create(&request).unwrap_err(),
            ValidationError::too_long("footer.terms", 2000)
        );
    }

    #[test]
    fn test_draft_into_invoice_applies_defaults() {
        let draft = validate_create(&base_request()).unwrap();
        let defaults = InvoiceDefaults {
            currency: "INR".to_string(),
            tax_percent: Decimal::from(18),
            footer: Footer {
                business_name: Some("VR Productions".to_string()),
                ..Footer::default()
            },
        };
        assert_eq!(draft.effective_tax_percent(&defaults), Decimal::from(18));

        let invoice = draft.into_invoice("inv_1".to_string(), Utc::now(), Summary::default(), &defaults);
        assert_eq!(invoice.currency, "INR");
        assert_eq!(invoice.footer.business_name.as_deref(), Some("VR Productions"));
        assert_eq!(invoice.status, invoice.payment_status);
    }

    #[test]
    fn test_patch_allow_list() {
        let patch = validate_patch(&PatchInvoiceRequest {
            status: Some("paid".to_string()),
            notes: Some("  thanks  ".to_string()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(patch.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(patch.notes.as_deref(), Some("thanks"));
        assert_eq!(patch.payment_method, None);
    }

    #[test]
    fn test_patch_empty_string_clears() {
        let patch = validate_patch(&PatchInvoiceRequest {
            payment_method: Some("   ".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.payment_method.as_deref(), Some(""));
    }

    #[test]
    fn test_patch_caps_and_enum() {
        let err = validate_patch(&PatchInvoiceRequest {
            notes: Some("n".repeat(1201)),
            ..Default::default()
        })
        .unwrap_err();
        assert_eq!(err, ValidationError::too_long("notes", 1200));

        let err = validate_patch(&PatchInvoiceRequest {
            payment_status: Some("refunded".to_string()),
            ..Default::default()
        })
        .unwrap_err();
        assert!(matches!(err, ValidationError::NotAllowed { .. }));
    }
}
