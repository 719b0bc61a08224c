//! # Invoice Repository
//!
//! Database operations for invoices and their lines.
//!
//! ## Invoice Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    insert_priced (one transaction)                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── INSERT INTO invoices (total, tax, grand_total, ...)             │
//! │    │        → invoice_id = last_insert_rowid()                         │
//! │    │                                                                    │
//! │    ├── INSERT INTO invoice_items (invoice_id, line_no = 0, ...)        │
//! │    ├── INSERT INTO invoice_items (invoice_id, line_no = 1, ...)        │
//! │    └── ...                                                              │
//! │    │                                                                    │
//! │  COMMIT  ← any failure before this point rolls everything back         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads hydrate each line with its catalog item, including items that were
//! soft-deleted after the invoice was written.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use pizzeria_core::{Invoice, InvoiceItem, Item, Money, PricedInvoice, RecordStatus};

// =============================================================================
// Row Mapping
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    date: DateTime<Utc>,
    total_cents: i64,
    tax_cents: i64,
    grand_total_cents: i64,
}

impl InvoiceRow {
    fn into_invoice(self, invoice_items: Vec<InvoiceItem>) -> Invoice {
        Invoice {
            id: self.id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            date: self.date,
            total: Money::from_cents(self.total_cents),
            tax: Money::from_cents(self.tax_cents),
            grand_total: Money::from_cents(self.grand_total_cents),
            invoice_items,
        }
    }
}

/// An `invoice_items` row joined with its `items` row.
#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    id: i64,
    invoice_id: i64,
    item_id: i64,
    quantity: i64,
    subtotal_cents: i64,
    item_created_at: DateTime<Utc>,
    item_updated_at: DateTime<Utc>,
    item_name: String,
    item_category: String,
    item_price_cents: i64,
    item_availability: bool,
    item_status: RecordStatus,
}

impl From<LineRow> for InvoiceItem {
    fn from(row: LineRow) -> Self {
        InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            item_id: row.item_id,
            quantity: row.quantity,
            subtotal: Money::from_cents(row.subtotal_cents),
            item: Item {
                id: row.item_id,
                created_at: row.item_created_at,
                updated_at: row.item_updated_at,
                name: row.item_name,
                category: row.item_category,
                price: Money::from_cents(row.item_price_cents),
                availability: row.item_availability,
                status: row.item_status,
            },
        }
    }
}

const INVOICE_COLUMNS: &str =
    "id, created_at, updated_at, date, total_cents, tax_cents, grand_total_cents";

const LINE_SELECT: &str = r#"
    SELECT
        ii.id,
        ii.invoice_id,
        ii.item_id,
        ii.quantity,
        ii.subtotal_cents,
        i.created_at   AS item_created_at,
        i.updated_at   AS item_updated_at,
        i.name         AS item_name,
        i.category     AS item_category,
        i.price_cents  AS item_price_cents,
        i.availability AS item_availability,
        i.status       AS item_status
    FROM invoice_items ii
    INNER JOIN items i ON i.id = ii.item_id
    WHERE ii.status = 'active'
"#;

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Persists a priced invoice and all of its lines atomically.
    ///
    /// `date` is the business date; `created_at` is always now.
    /// Returns the new invoice id.
    pub async fn insert_priced(
        &self,
        priced: &PricedInvoice,
        date: Option<DateTime<Utc>>,
    ) -> DbResult<i64> {
        let now = Utc::now();
        let date = date.unwrap_or(now);

        let mut tx = self.pool.begin().await?;

        let invoice_id = sqlx::query(
            r#"
            INSERT INTO invoices (
                created_at, updated_at, date,
                total_cents, tax_cents, grand_total_cents, status
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'active')
            "#,
        )
        .bind(now)
        .bind(now)
        .bind(date)
        .bind(priced.total.cents())
        .bind(priced.tax.cents())
        .bind(priced.grand_total.cents())
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for (line_no, line) in priced.lines.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO invoice_items (
                    created_at, updated_at, invoice_id, item_id,
                    line_no, quantity, subtotal_cents, status
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 'active')
                "#,
            )
            .bind(now)
            .bind(now)
            .bind(invoice_id)
            .bind(line.item_id)
            .bind(line_no as i64)
            .bind(line.quantity)
            .bind(line.subtotal.cents())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            invoice_id,
            lines = priced.lines.len(),
            grand_total = %priced.grand_total,
            "Invoice persisted"
        );

        Ok(invoice_id)
    }

    /// Gets an active invoice with its lines in creation order.
    pub async fn get(&self, id: i64) -> DbResult<Option<Invoice>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = ?1 AND status = 'active'"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let lines = sqlx::query_as::<_, LineRow>(&format!(
            "{LINE_SELECT} AND ii.invoice_id = ?1 ORDER BY ii.line_no"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(
            row.into_invoice(lines.into_iter().map(InvoiceItem::from).collect()),
        ))
    }

    /// Lists active invoices, newest first, each with its lines.
    pub async fn list(&self) -> DbResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE status = 'active' \
             ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Filtered in SQL so the statement has no per-invoice binds
        let lines = sqlx::query_as::<_, LineRow>(&format!(
            "{LINE_SELECT} AND ii.invoice_id IN \
             (SELECT id FROM invoices WHERE status = 'active') \
             ORDER BY ii.invoice_id, ii.line_no"
        ))
        .fetch_all(&self.pool)
        .await?;

        let mut by_invoice: HashMap<i64, Vec<InvoiceItem>> = HashMap::new();
        for line in lines {
            by_invoice
                .entry(line.invoice_id)
                .or_default()
                .push(InvoiceItem::from(line));
        }

        debug!(count = rows.len(), "Listed invoices");

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_invoice.remove(&row.id).unwrap_or_default();
                row.into_invoice(items)
            })
            .collect())
    }

    /// Soft-deletes an active invoice and its lines in one transaction.
    ///
    /// Returns `false` when the invoice is missing or already deleted.
    pub async fn soft_delete(&self, id: i64) -> DbResult<bool> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE invoices SET status = 'deleted', updated_at = ?2 \
             WHERE id = ?1 AND status = 'active'",
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        let lines = sqlx::query(
            "UPDATE invoice_items SET status = 'deleted', updated_at = ?2 \
             WHERE invoice_id = ?1 AND status = 'active'",
        )
        .bind(id)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        info!(invoice_id = id, lines, "Invoice soft-deleted");
        Ok(true)
    }

    /// Counts all invoice rows, deleted ones included.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts all invoice line rows, deleted ones included.
    pub async fn count_lines(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoice_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
