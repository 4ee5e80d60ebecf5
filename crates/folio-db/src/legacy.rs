//! # Legacy Snapshot Import
//!
//! One-time import of the flat-file `invoices.json` snapshot into an empty
//! store.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  store.is_empty()? ── no ──▶ done (0)                                   │
//! │       │ yes                                                             │
//! │       ▼                                                                 │
//! │  read snapshot ── missing / unreadable / not an array ──▶ warn, 0       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  per entry: skip if no id, normalize numbers, recompute summary         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  store.insert_many(batch)  ← duplicates ignored                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The snapshot file is never modified.

use chrono::{DateTime, Utc};
use folio_core::summary::{line_amount, summarize};
use folio_core::{
    AdditionalCharges, ClientInfo, Footer, Invoice, Money, PaymentStatus, ServiceLine,
    DEFAULT_CURRENCY, MAX_TAX_PERCENT,
};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use crate::error::StoreResult;
use crate::store::InvoiceStore;

/// Where the flat-file era kept its invoices.
pub const DEFAULT_SNAPSHOT_PATH: &str = "data/invoices.json";

/// Client name given to snapshot entries that never recorded one.
pub const UNNAMED_CLIENT: &str = "(unnamed client)";

/// Imports the snapshot at `path` if the store holds no invoices.
///
/// Returns how many invoices were inserted. A missing or malformed snapshot
/// is logged and treated as empty; only store failures are returned as errors.
pub async fn migrate_legacy_snapshot(store: &dyn InvoiceStore, path: &Path) -> StoreResult<usize> {
    if !store.is_empty().await? {
        debug!(backend = store.backend(), "Store already seeded, skipping snapshot import");
        return Ok(0);
    }

    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No legacy snapshot found");
            return Ok(0);
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Failed to read legacy snapshot");
            return Ok(0);
        }
    };

    if raw.trim().is_empty() {
        return Ok(0);
    }

    let entries: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Legacy snapshot is not a JSON array");
            return Ok(0);
        }
    };

    let now = Utc::now();
    let invoices: Vec<Invoice> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let normalized = entry.as_object().and_then(|obj| normalize_entry(obj, now));
            if normalized.is_none() {
                warn!(index, "Skipping legacy entry without an id");
            }
            normalized
        })
        .collect();

    if invoices.is_empty() {
        return Ok(0);
    }

    let inserted = store.insert_many(&invoices).await?;
    info!(
        backend = store.backend(),
        found = entries.len(),
        inserted,
        "Imported legacy invoice snapshot"
    );
    Ok(inserted)
}

/// Turns one loosely-typed snapshot entry into an invoice.
fn normalize_entry(entry: &Map<String, Value>, now: DateTime<Utc>) -> Option<Invoice> {
    let id = text(entry.get("id"))?;

    let created_at = text(entry.get("createdAt"))
        .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);

    let status = parse_status(entry.get("paymentStatus"))
        .or_else(|| parse_status(entry.get("status")))
        .unwrap_or_default();

    let lines: Vec<ServiceLine> = entry
        .get("services")
        .or_else(|| entry.get("lines"))
        .and_then(Value::as_array)
        .map(|rows| rows.iter().filter_map(|row| row.as_object().and_then(normalize_line)).collect())
        .unwrap_or_default();

    let charges = entry
        .get("additionalCharges")
        .and_then(Value::as_object)
        .map(|obj| AdditionalCharges {
            extra_revision: money(obj.get("extraRevision")),
            express_delivery: money(obj.get("expressDelivery")),
            addons_amount: money(obj.get("addonsAmount")),
            addons_description: text(obj.get("addonsDescription")),
        })
        .unwrap_or_default();

    let summary_block = entry.get("summary").and_then(Value::as_object);
    let tax_percent = number(summary_block.and_then(|s| s.get("taxPercent")))
        .min(Decimal::from(MAX_TAX_PERCENT));
    let discount = money(summary_block.and_then(|s| s.get("discount")));
    let summary = summarize(&lines, &charges, tax_percent, discount);

    let footer = entry
        .get("footer")
        .cloned()
        .and_then(|value| match serde_json::from_value::<Footer>(value) {
            Ok(footer) => Some(footer),
            Err(err) => {
                warn!(id = %id, error = %err, "Dropping unreadable legacy footer");
                None
            }
        })
        .unwrap_or_default();

    Some(Invoice {
        client: ClientInfo {
            name: text(entry.get("clientName")).unwrap_or_else(|| UNNAMED_CLIENT.to_string()),
            address: text(entry.get("clientAddress")),
            city: text(entry.get("clientCity")),
            email: text(entry.get("clientEmail")),
            phone: text(entry.get("clientPhone")),
        },
        project_name: text(entry.get("projectName")),
        project_id: text(entry.get("projectId")),
        reference: text(entry.get("reference")),
        invoice_date: text(entry.get("invoiceDate")),
        due_date: text(entry.get("dueDate")),
        lines,
        additional_charges: charges,
        summary,
        currency: text(entry.get("currency")).unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        status,
        payment_status: status,
        payment_method: text(entry.get("paymentMethod")),
        notes: text(entry.get("notes")),
        footer,
        created_at,
        id,
    })
}

fn normalize_line(row: &Map<String, Value>) -> Option<ServiceLine> {
    let description = text(row.get("description"));
    let name = text(row.get("name")).or_else(|| description.clone())?;
    let quantity = number(row.get("quantity"));
    let rate = money(row.get("rate"));
    let explicit = decimal(row.get("amount")).map(Money::from_decimal);

    Some(ServiceLine {
        name,
        description,
        quantity,
        rate,
        amount: line_amount(quantity, rate, explicit),
    })
}

/// Non-empty trimmed string; numbers are accepted and stringified.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Non-negative decimal, if the value holds one.
fn decimal(value: Option<&Value>) -> Option<Decimal> {
    let parsed = match value {
        Some(Value::Number(n)) => {
            let raw = n.to_string();
            Decimal::from_str(&raw)
                .or_else(|_| Decimal::from_scientific(&raw))
                .ok()
        }
        Some(Value::String(s)) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    };

    parsed.filter(|d| !d.is_sign_negative())
}

/// Like [`decimal`], with anything unreadable or negative read as zero.
fn number(value: Option<&Value>) -> Decimal {
    decimal(value).unwrap_or(Decimal::ZERO)
}

fn money(value: Option<&Value>) -> Money {
    Money::from_decimal(number(value))
}

fn parse_status(value: Option<&Value>) -> Option<PaymentStatus> {
    text(value).and_then(|raw| PaymentStatus::from_str(&raw.to_lowercase()).ok())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::fixtures::invoice;
    use serde_json::json;
    use std::io::Write;

    fn snapshot(value: &Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{value}").unwrap();
        file
    }

    async fn store() -> crate::repository::invoice::InvoiceRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().invoices()
    }

    #[tokio::test]
    async fn test_imports_into_empty_store() {
        let repo = store().await;
        let file = snapshot(&json!([
            {
                "id": "inv_legacy1",
                "createdAt": "2023-11-02T08:30:00.000Z",
                "clientName": "Northwind",
                "services": [
                    { "name": "Video edit", "quantity": 2, "rate": 150, "amount": 300 },
                    { "description": "Colour grade", "quantity": "1", "rate": "80.5" }
                ],
                "summary": { "taxPercent": 10, "discount": 0, "total": 9999 },
                "paymentStatus": "paid",
                "footer": { "businessName": "Studio" }
            },
            {
                "id": "inv_legacy2",
                "createdAt": "2023-11-01T08:30:00.000Z",
                "services": []
            }
        ]));

        let inserted = migrate_legacy_snapshot(&repo, file.path()).await.unwrap();
        assert_eq!(inserted, 2);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed[0].id, "inv_legacy2");
        assert_eq!(listed[0].client.name, UNNAMED_CLIENT);

        let first = &listed[1];
        assert_eq!(first.lines.len(), 2);
        assert_eq!(first.lines[1].name, "Colour grade");
        assert_eq!(first.summary.subtotal, Money::from_cents(38050));
        assert_eq!(first.summary.tax_amount, Money::from_cents(3805));
        assert_eq!(first.summary.total, Money::from_cents(41855));
        assert_eq!(first.status, PaymentStatus::Paid);
        assert_eq!(first.payment_status, PaymentStatus::Paid);
        assert_eq!(first.footer.business_name.as_deref(), Some("Studio"));
        assert_eq!(first.currency, DEFAULT_CURRENCY);
    }

    #[tokio::test]
    async fn test_skips_when_store_has_rows() {
        let repo = store().await;
        repo.insert(&invoice("inv_existing", 0)).await.unwrap();
        let file = snapshot(&json!([{ "id": "inv_legacy1" }]));

        assert_eq!(migrate_legacy_snapshot(&repo, file.path()).await.unwrap(), 0);
        assert!(repo.get_by_id("inv_legacy1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_entries_without_id_are_skipped() {
        let repo = store().await;
        let file = snapshot(&json!([
            { "clientName": "No id" },
            "not an object",
            { "id": "inv_ok", "clientName": "Has id" }
        ]));

        assert_eq!(migrate_legacy_snapshot(&repo, file.path()).await.unwrap(), 1);
        assert!(repo.get_by_id("inv_ok").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_or_malformed_snapshot_is_not_fatal() {
        let repo = store().await;
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("invoices.json");
        assert_eq!(migrate_legacy_snapshot(&repo, &missing).await.unwrap(), 0);

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "{{ not json").unwrap();
        assert_eq!(migrate_legacy_snapshot(&repo, bad.path()).await.unwrap(), 0);
        assert!(repo.is_empty().await.unwrap());
    }

    #[test]
    fn test_numbers_are_sanitized() {
        assert_eq!(number(Some(&json!(-5))), Decimal::ZERO);
        assert_eq!(number(Some(&json!("abc"))), Decimal::ZERO);
        assert_eq!(number(Some(&json!(null))), Decimal::ZERO);
        assert_eq!(number(Some(&json!("12.50"))), Decimal::new(1250, 2));
        assert_eq!(number(Some(&json!(1e3))), Decimal::from(1000));
    }

    #[test]
    fn test_status_falls_back_through_both_fields() {
        let now = Utc::now();
        let entry = json!({ "id": "a", "status": "partial" });
        let normalized = normalize_entry(entry.as_object().unwrap(), now).unwrap();
        assert_eq!(normalized.payment_status, PaymentStatus::Partial);
        assert_eq!(normalized.created_at, now);

        let entry = json!({ "id": "b", "status": "bogus" });
        let normalized = normalize_entry(entry.as_object().unwrap(), now).unwrap();
        assert_eq!(normalized.status, PaymentStatus::Unpaid);
    }
}
