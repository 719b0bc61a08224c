//! Catalog service.
//!
//! Manages the items that invoices can reference.

use tracing::{debug, info};

use pizzeria_core::{Item, ItemUpdate, NewItem};
use pizzeria_db::Database;

use crate::error::{ApiError, ApiResult};

const ITEM_NOT_FOUND: &str = "Item not found";

/// Catalog service implementation.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    /// Create a new catalog service.
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Lists active items ordered by id.
    pub async fn list_items(&self) -> ApiResult<Vec<Item>> {
        self.db
            .items()
            .list_active()
            .await
            .map_err(|e| ApiError::storage("Failed to fetch items", e))
    }

    /// Validates and stores a new item. Availability defaults to true.
    pub async fn create_item(&self, new_item: NewItem) -> ApiResult<Item> {
        let new_item = new_item.validated()?;

        let item = self
            .db
            .items()
            .insert(&new_item)
            .await
            .map_err(|e| ApiError::storage("Failed to create item", e))?;

        info!(id = item.id, name = %item.name, price = %item.price, "Item created");
        Ok(item)
    }

    /// Merges a partial update into an active item.
    ///
    /// An update that changes nothing is not written.
    pub async fn update_item(&self, id: i64, update: ItemUpdate) -> ApiResult<Item> {
        let repo = self.db.items();

        let mut item = repo
            .get_active(id)
            .await
            .map_err(|e| ApiError::storage("Failed to update item", e))?
            .ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))?;

        if !item.apply_update(update)? {
            debug!(id, "Item update changed nothing");
            return Ok(item);
        }

        let updated = repo
            .update(&item)
            .await
            .map_err(|e| ApiError::storage("Failed to update item", e))?;
        if !updated {
            return Err(ApiError::not_found(ITEM_NOT_FOUND));
        }

        // Re-read for the stored updated_at
        let item = repo
            .get_active(id)
            .await
            .map_err(|e| ApiError::storage("Failed to update item", e))?
            .ok_or_else(|| ApiError::not_found(ITEM_NOT_FOUND))?;

        info!(id, "Item updated");
        Ok(item)
    }

    /// Soft-deletes an active item.
    pub async fn delete_item(&self, id: i64) -> ApiResult<()> {
        let deleted = self
            .db
            .items()
            .soft_delete(id)
            .await
            .map_err(|e| ApiError::storage("Failed to delete item", e))?;

        if !deleted {
            return Err(ApiError::not_found(ITEM_NOT_FOUND));
        }

        info!(id, "Item deleted");
        Ok(())
    }
}
