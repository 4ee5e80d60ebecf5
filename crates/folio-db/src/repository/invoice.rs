//! # Invoice Repository
//!
//! The embedded `InvoiceStore`: one SQLite row per invoice.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert / update / delete / insert_many                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write_gate.lock()      ← one writer per process                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN                                                                  │
//! │    update: SELECT data → decode → patch.apply_to → re-encode            │
//! │    write row + denormalized columns                                     │
//! │  COMMIT                 ← WAL: readers never see half a write           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use folio_core::{Invoice, InvoicePatch};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::{decode_document, InvoiceRow, InvoiceStore};

const INSERT_SQL: &str = r#"
    INSERT INTO invoices (
        id, created_at, status, payment_status,
        payment_method, currency, total, data
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

const INSERT_IGNORE_SQL: &str = r#"
    INSERT OR IGNORE INTO invoices (
        id, created_at, status, payment_status,
        payment_method, currency, total, data
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

/// Repository for invoice database operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
    write_gate: Arc<Mutex<()>>,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository sharing the database's write gate.
    pub fn new(pool: SqlitePool, write_gate: Arc<Mutex<()>>) -> Self {
        InvoiceRepository { pool, write_gate }
    }

    /// Number of stored rows.
    pub async fn count(&self) -> StoreResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

fn bind_row<'q>(
    sql: &'q str,
    row: &'q InvoiceRow,
    data: String,
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    sqlx::query(sql)
        .bind(&row.id)
        .bind(&row.created_at)
        .bind(row.status)
        .bind(row.payment_status)
        .bind(&row.payment_method)
        .bind(&row.currency)
        .bind(row.total)
        .bind(data)
}

#[async_trait]
impl InvoiceStore for InvoiceRepository {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, invoice: &Invoice) -> StoreResult<()> {
        debug!(id = %invoice.id, "Inserting invoice");

        let row = InvoiceRow::from_invoice(invoice)?;
        let _guard = self.write_gate.lock().await;

        bind_row(INSERT_SQL, &row, row.data_text())
            .execute(&self.pool)
            .await
            .map_err(|err| match StoreError::from(err) {
                StoreError::Duplicate { .. } => StoreError::Duplicate {
                    id: invoice.id.clone(),
                },
                other => other,
            })?;

        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Invoice>> {
        debug!(id = %id, "Fetching invoice");

        let data: Option<String> = sqlx::query_scalar("SELECT data FROM invoices WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        data.map(|data| decode_document(id, &data)).transpose()
    }

    async fn list(&self) -> StoreResult<Vec<Invoice>> {
        let rows: Vec<(String, String)> =
            sqlx::query_as("SELECT id, data FROM invoices ORDER BY created_at ASC, id ASC")
                .fetch_all(&self.pool)
                .await?;

        debug!(count = rows.len(), "Listing invoices");

        let invoices = rows
            .into_iter()
            .filter_map(|(id, data)| match decode_document(&id, &data) {
                Ok(invoice) => Some(invoice),
                Err(err) => {
                    warn!(id = %id, error = %err, "Skipping unreadable invoice row");
                    None
                }
            })
            .collect();

        Ok(invoices)
    }

    async fn update(&self, id: &str, patch: &InvoicePatch) -> StoreResult<bool> {
        debug!(id = %id, "Updating invoice");

        let _guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let data: Option<String> = sqlx::query_scalar("SELECT data FROM invoices WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(data) = data else {
            return Ok(false);
        };

        let mut invoice = decode_document(id, &data)?;
        patch.apply_to(&mut invoice);
        let row = InvoiceRow::from_invoice(&invoice)?;

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET status = ?1,
                payment_status = ?2,
                payment_method = ?3,
                currency = ?4,
                total = ?5,
                data = ?6
            WHERE id = ?7
            "#,
        )
        .bind(row.status)
        .bind(row.payment_status)
        .bind(&row.payment_method)
        .bind(&row.currency)
        .bind(row.total)
        .bind(row.data_text())
        .bind(id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        debug!(id = %id, "Deleting invoice");

        let _guard = self.write_gate.lock().await;
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn is_empty(&self) -> StoreResult<bool> {
        let first: Option<String> = sqlx::query_scalar("SELECT id FROM invoices LIMIT 1")
            .fetch_optional(&self.pool)
            .await?;
        Ok(first.is_none())
    }

    async fn insert_many(&self, invoices: &[Invoice]) -> StoreResult<usize> {
        let rows = invoices
            .iter()
            .map(InvoiceRow::from_invoice)
            .collect::<StoreResult<Vec<_>>>()?;

        let _guard = self.write_gate.lock().await;
        let mut tx = self.pool.begin().await?;

        let mut inserted = 0u64;
        for row in &rows {
            let result = bind_row(INSERT_IGNORE_SQL, row, row.data_text())
                .execute(&mut *tx)
                .await?;
            inserted += result.rows_affected();
        }

        tx.commit().await?;

        debug!(requested = rows.len(), inserted, "Bulk inserted invoices");
        Ok(inserted as usize)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::fixtures::invoice;
    use folio_core::PaymentStatus;

    async fn repo() -> InvoiceRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().invoices()
    }

    #[tokio::test]
    async fn test_insert_and_get_roundtrip() {
        let repo = repo().await;
        let original = invoice("inv_a", 0);

        repo.insert(&original).await.unwrap();
        let loaded = repo.get_by_id("inv_a").await.unwrap().unwrap();

        assert_eq!(loaded, original);
        assert!(repo.get_by_id("inv_missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_insert_is_rejected() {
        let repo = repo().await;
        repo.insert(&invoice("inv_a", 0)).await.unwrap();

        let err = repo.insert(&invoice("inv_a", 5)).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { ref id } if id == "inv_a"));
    }

    #[tokio::test]
    async fn test_list_orders_by_created_at() {
        let repo = repo().await;
        repo.insert(&invoice("inv_c", 30)).await.unwrap();
        repo.insert(&invoice("inv_a", 0)).await.unwrap();
        repo.insert(&invoice("inv_b", 10)).await.unwrap();

        let ids: Vec<String> = repo.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["inv_a", "inv_b", "inv_c"]);
    }

    #[tokio::test]
    async fn test_update_merges_patch_and_columns() {
        let repo = repo().await;
        let original = invoice("inv_a", 0);
        repo.insert(&original).await.unwrap();

        let patch = InvoicePatch {
            payment_status: Some(PaymentStatus::Paid),
            payment_method: Some("Bank transfer".to_string()),
            ..InvoicePatch::default()
        };
        assert!(repo.update("inv_a", &patch).await.unwrap());

        let loaded = repo.get_by_id("inv_a").await.unwrap().unwrap();
        assert_eq!(loaded.status, PaymentStatus::Paid);
        assert_eq!(loaded.payment_status, PaymentStatus::Paid);
        assert_eq!(loaded.payment_method.as_deref(), Some("Bank transfer"));
        assert_eq!(loaded.lines, original.lines);
        assert_eq!(loaded.summary, original.summary);

        let (status, method): (String, Option<String>) =
            sqlx::query_as("SELECT payment_status, payment_method FROM invoices WHERE id = 'inv_a'")
                .fetch_one(&repo.pool)
                .await
                .unwrap();
        assert_eq!(status, "paid");
        assert_eq!(method.as_deref(), Some("Bank transfer"));
    }

    #[tokio::test]
    async fn test_update_missing_returns_false() {
        let repo = repo().await;
        let patch = InvoicePatch {
            notes: Some("hello".to_string()),
            ..InvoicePatch::default()
        };
        assert!(!repo.update("inv_missing", &patch).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = repo().await;
        repo.insert(&invoice("inv_a", 0)).await.unwrap();

        assert!(repo.delete("inv_a").await.unwrap());
        assert!(!repo.delete("inv_a").await.unwrap());
        assert!(repo.get_by_id("inv_a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_is_empty_and_insert_many_ignores_duplicates() {
        let repo = repo().await;
        assert!(repo.is_empty().await.unwrap());

        repo.insert(&invoice("inv_a", 0)).await.unwrap();
        let batch = vec![invoice("inv_a", 0), invoice("inv_b", 1), invoice("inv_c", 2)];
        assert_eq!(repo.insert_many(&batch).await.unwrap(), 2);

        assert!(!repo.is_empty().await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_corrupt_row_skipped_in_list() {
        let repo = repo().await;
        repo.insert(&invoice("inv_a", 0)).await.unwrap();
        sqlx::query(
            "INSERT INTO invoices (id, created_at, status, payment_status, total, data) \
             VALUES ('inv_bad', '2024-01-01T00:00:00.000Z', 'unpaid', 'unpaid', 0, 'not json')",
        )
        .execute(&repo.pool)
        .await
        .unwrap();

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert!(matches!(
            repo.get_by_id("inv_bad").await.unwrap_err(),
            StoreError::Corrupt { .. }
        ));
    }

    #[tokio::test]
    async fn test_concurrent_patches_serialize() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::new(dir.path().join("folio.db"))).await.unwrap();
        let repo = db.invoices();
        repo.insert(&invoice("inv_a", 0)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = db.invoices();
            handles.push(tokio::spawn(async move {
                let patch = InvoicePatch {
                    notes: Some(format!("note {i}")),
                    ..InvoicePatch::default()
                };
                repo.update("inv_a", &patch).await
            }));
        }
        for handle in handles {
            assert!(handle.await.unwrap().unwrap());
        }

        let loaded = repo.get_by_id("inv_a").await.unwrap().unwrap();
        assert!(loaded.notes.unwrap().starts_with("note "));
    }
}
