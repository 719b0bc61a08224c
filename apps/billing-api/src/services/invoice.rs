//! Invoice service.
//!
//! ## Invoice Assembly
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /api/invoices { items: [...] }                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. catalog snapshot      (active items for the referenced ids)        │
//! │  2. PricingEngine::price  (validation, subtotals, totals, tax)         │
//! │  3. insert_priced         (one transaction: invoice + lines)           │
//! │  4. reload                (lines with their items)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is written unless every line prices successfully. Prices read in
//! step 1 are not locked; a concurrent catalog edit between steps 1 and 3 is
//! accepted.

use tracing::info;

use pizzeria_core::{CoreError, CreateInvoiceRequest, Invoice, PricingEngine};
use pizzeria_db::Database;

use crate::error::{ApiError, ApiResult};

/// Invoice service implementation.
#[derive(Debug, Clone)]
pub struct InvoiceService {
    db: Database,
    engine: PricingEngine,
}

impl InvoiceService {
    /// Create a new invoice service.
    pub fn new(db: Database, engine: PricingEngine) -> Self {
        InvoiceService { db, engine }
    }

    /// Prices and persists a new invoice, returning it fully hydrated.
    pub async fn create_invoice(&self, request: CreateInvoiceRequest) -> ApiResult<Invoice> {
        let ids: Vec<i64> = request.items.iter().map(|line| line.item_id).collect();
        let snapshot = self
            .db
            .items()
            .find_active_by_ids(&ids)
            .await
            .map_err(|e| ApiError::storage("Failed to create invoice", e))?;

        let priced = self.engine.price(&request.items, &snapshot)?;

        let id = self
            .db
            .invoices()
            .insert_priced(&priced, request.date)
            .await
            .map_err(|e| ApiError::storage("Failed to create invoice", e))?;

        info!(
            id,
            total = %priced.total,
            tax = %priced.tax,
            grand_total = %priced.grand_total,
            "Invoice created"
        );

        self.get_invoice(id).await
    }

    /// Lists active invoices, newest first.
    pub async fn list_invoices(&self) -> ApiResult<Vec<Invoice>> {
        self.db
            .invoices()
            .list()
            .await
            .map_err(|e| ApiError::storage("Failed to fetch invoices", e))
    }

    /// Gets one active invoice.
    pub async fn get_invoice(&self, id: i64) -> ApiResult<Invoice> {
        self.db
            .invoices()
            .get(id)
            .await
            .map_err(|e| ApiError::storage("Failed to fetch invoice", e))?
            .ok_or_else(|| CoreError::InvoiceNotFound(id).into())
    }

    /// Soft-deletes an invoice and its lines.
    pub async fn delete_invoice(&self, id: i64) -> ApiResult<()> {
        let deleted = self
            .db
            .invoices()
            .soft_delete(id)
            .await
            .map_err(|e| ApiError::storage("Failed to delete invoice", e))?;

        if !deleted {
            return Err(CoreError::InvoiceNotFound(id).into());
        }

        info!(id, "Invoice deleted");
        Ok(())
    }
}
