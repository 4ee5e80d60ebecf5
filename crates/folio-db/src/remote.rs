//! # Remote Invoice Store
//!
//! `InvoiceStore` backed by a hosted Postgres table reached through its
//! PostgREST endpoint (`{url}/rest/v1/invoices`).
//!
//! ## Request Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  every request                                                          │
//! │    apikey: <service key>                                                │
//! │    Authorization: Bearer <service key>                                  │
//! │    Accept-Profile / Content-Profile: <schema>                           │
//! │                                                                         │
//! │  list        GET    ?select=id,data&order=created_at.asc,id.asc         │
//! │  get_by_id   GET    ?select=id,data&id=eq.X&limit=1                     │
//! │  insert      POST   row                         Prefer: return=minimal  │
//! │  insert_many POST   [rows] ?on_conflict=id      ignore-duplicates       │
//! │  update      GET doc → patch locally → PATCH ?id=eq.X                   │
//! │  delete      DELETE ?id=eq.X&select=id          return=representation   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The remote service has no cross-request transactions, so two concurrent
//! patches of the same invoice resolve as last write wins.

use async_trait::async_trait;
use folio_core::{Invoice, InvoicePatch};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::{decode_value, InvoiceRow, InvoiceStore};

const TABLE_PATH: &str = "rest/v1/invoices";

/// Connection settings for the remote backend.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Project URL, e.g. `https://abc.supabase.co`.
    pub url: String,
    /// Service-role key sent as both `apikey` and bearer token.
    pub service_key: String,
    /// Postgres schema holding the `invoices` table.
    pub schema: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl RemoteConfig {
    pub fn new(url: impl Into<String>, service_key: impl Into<String>) -> Self {
        RemoteConfig {
            url: url.into(),
            service_key: service_key.into(),
            schema: "public".to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct DocumentRow {
    id: String,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct IdRow {
    id: String,
}

/// PostgREST-backed invoice store.
#[derive(Debug, Clone)]
pub struct RestInvoiceStore {
    client: Client,
    endpoint: String,
    service_key: String,
    schema: String,
}

impl RestInvoiceStore {
    /// Builds the HTTP client. Does not contact the server.
    pub fn new(config: &RemoteConfig) -> StoreResult<Self> {
        if config.url.trim().is_empty() || config.service_key.trim().is_empty() {
            return Err(StoreError::Connection(
                "remote store requires a url and a service key".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Ok(RestInvoiceStore {
            client,
            endpoint: format!("{}/{}", config.url.trim_end_matches('/'), TABLE_PATH),
            service_key: config.service_key.clone(),
            schema: config.schema.clone(),
        })
    }

    fn request(&self, method: reqwest::Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Accept-Profile", &self.schema)
            .header("Content-Profile", &self.schema)
    }

    /// Sends the request and turns any non-2xx answer into `StoreError::Remote`.
    async fn send(&self, builder: RequestBuilder) -> StoreResult<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), message = %message, "Remote store request failed");
        Err(StoreError::Remote {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch_document(&self, id: &str) -> StoreResult<Option<Invoice>> {
        let response = self
            .send(self.request(reqwest::Method::GET).query(&[
                ("select", "id,data".to_string()),
                ("id", format!("eq.{id}")),
                ("limit", "1".to_string()),
            ]))
            .await?;

        let rows: Vec<DocumentRow> = response.json().await?;
        rows.into_iter()
            .next()
            .map(|row| decode_value(&row.id, row.data))
            .transpose()
    }
}

#[async_trait]
impl InvoiceStore for RestInvoiceStore {
    fn backend(&self) -> &'static str {
        "remote"
    }

    async fn insert(&self, invoice: &Invoice) -> StoreResult<()> {
        debug!(id = %invoice.id, "Inserting invoice remotely");

        let row = InvoiceRow::from_invoice(invoice)?;
        let result = self
            .send(
                self.request(reqwest::Method::POST)
                    .header("Prefer", "return=minimal")
                    .json(&row),
            )
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(StoreError::Remote { status, .. }) if status == StatusCode::CONFLICT.as_u16() => {
                Err(StoreError::Duplicate {
                    id: invoice.id.clone(),
                })
            }
            Err(err) => Err(err),
        }
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Invoice>> {
        debug!(id = %id, "Fetching invoice remotely");
        self.fetch_document(id).await
    }

    async fn list(&self) -> StoreResult<Vec<Invoice>> {
        let response = self
            .send(self.request(reqwest::Method::GET).query(&[
                ("select", "id,data"),
                ("order", "created_at.asc,id.asc"),
            ]))
            .await?;

        let rows: Vec<DocumentRow> = response.json().await?;
        debug!(count = rows.len(), "Listing invoices remotely");

        let invoices = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id.clone();
                match decode_value(&row.id, row.data) {
                    Ok(invoice) => Some(invoice),
                    Err(err) => {
                        warn!(id = %id, error = %err, "Skipping unreadable invoice row");
                        None
                    }
                }
            })
            .collect();

        Ok(invoices)
    }

    async fn update(&self, id: &str, patch: &InvoicePatch) -> StoreResult<bool> {
        debug!(id = %id, "Updating invoice remotely");

        let Some(mut invoice) = self.fetch_document(id).await? else {
            return Ok(false);
        };
        patch.apply_to(&mut invoice);
        let row = InvoiceRow::from_invoice(&invoice)?;

        let body = json!({
            "status": row.status,
            "payment_status": row.payment_status,
            "payment_method": row.payment_method,
            "currency": row.currency,
            "total": row.total,
            "data": row.data,
        });

        let response = self
            .send(
                self.request(reqwest::Method::PATCH)
                    .query(&[("id", format!("eq.{id}")), ("select", "id".to_string())])
                    .header("Prefer", "return=representation")
                    .json(&body),
            )
            .await?;

        let rows: Vec<IdRow> = response.json().await?;
        Ok(rows.iter().any(|row| row.id == id))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        debug!(id = %id, "Deleting invoice remotely");

        let response = self
            .send(
                self.request(reqwest::Method::DELETE)
                    .query(&[("id", format!("eq.{id}")), ("select", "id".to_string())])
                    .header("Prefer", "return=representation"),
            )
            .await?;

        let rows: Vec<IdRow> = response.json().await?;
        Ok(rows.iter().any(|row| row.id == id))
    }

    async fn is_empty(&self) -> StoreResult<bool> {
        let response = self
            .send(
                self.request(reqwest::Method::GET)
                    .query(&[("select", "id"), ("limit", "1")]),
            )
            .await?;

        let rows: Vec<IdRow> = response.json().await?;
        Ok(rows.is_empty())
    }

    async fn insert_many(&self, invoices: &[Invoice]) -> StoreResult<usize> {
        if invoices.is_empty() {
            return Ok(0);
        }

        let rows = invoices
            .iter()
            .map(InvoiceRow::from_invoice)
            .collect::<StoreResult<Vec<_>>>()?;

        let response = self
            .send(
                self.request(reqwest::Method::POST)
                    .query(&[("on_conflict", "id"), ("select", "id")])
                    .header("Prefer", "resolution=ignore-duplicates,return=representation")
                    .json(&rows),
            )
            .await?;

        let inserted: Vec<IdRow> = response.json().await?;
        debug!(requested = rows.len(), inserted = inserted.len(), "Bulk inserted invoices remotely");
        Ok(inserted.len())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
