//! # Item Repository
//!
//! Database operations for catalog items.
//!
//! ## Soft Delete
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DELETE /api/items/4                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE items SET status = 'deleted' WHERE id = 4                      │
//! │       │                                                                 │
//! │       ├── list_active / get_active / find_active_by_ids: hidden        │
//! │       │                                                                 │
//! │       └── get_any: still resolves (invoice lines keep their item)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use pizzeria_core::{Item, Money, NewItem, RecordStatus};

/// Ids bound per `IN (...)` query; SQLite rejects statements above 32766.
const MAX_BINDS_PER_QUERY: usize = 10_000;

const ITEM_COLUMNS: &str =
    "id, created_at, updated_at, name, category, price_cents, availability, status";

// =============================================================================
// Row Mapping
// =============================================================================

/// Raw `items` row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ItemRow {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub category: String,
    pub price_cents: i64,
    pub availability: bool,
    pub status: RecordStatus,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Item {
            id: row.id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            name: row.name,
            category: row.category,
            price: Money::from_cents(row.price_cents),
            availability: row.availability,
            status: row.status,
        }
    }
}

/// Inserts one item through any executor (pool or open transaction).
pub(crate) async fn insert_item<'e, E>(executor: E, item: &NewItem) -> DbResult<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO items (
            created_at, updated_at, name, category, price_cents, availability, status
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 'active')
        "#,
    )
    .bind(now)
    .bind(now)
    .bind(&item.name)
    .bind(&item.category)
    .bind(item.price.cents())
    .bind(item.availability.unwrap_or(true))
    .execute(executor)
    .await?;

    Ok(result.last_insert_rowid())
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for catalog item operations.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    /// Creates a new ItemRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Lists active items ordered by id.
    pub async fn list_active(&self) -> DbResult<Vec<Item>> {
        let rows = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE status = 'active' ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Listed active items");
        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Gets an active item by id.
    pub async fn get_active(&self, id: i64) -> DbResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1 AND status = 'active'"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    /// Gets an item by id regardless of its status.
    ///
    /// Used to resolve historical invoice lines.
    pub async fn get_any(&self, id: i64) -> DbResult<Option<Item>> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Item::from))
    }

    /// Loads the active items among `ids`, keyed by id.
    ///
    /// Missing and soft-deleted ids are simply absent from the map.
    pub async fn find_active_by_ids(&self, ids: &[i64]) -> DbResult<HashMap<i64, Item>> {
        let mut unique: Vec<i64> = ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        let mut snapshot = HashMap::with_capacity(unique.len());
        for chunk in unique.chunks(MAX_BINDS_PER_QUERY) {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
                "SELECT {ITEM_COLUMNS} FROM items WHERE status = 'active' AND id IN ("
            ));
            let mut separated = builder.separated(", ");
            for id in chunk {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            let rows = builder
                .build_query_as::<ItemRow>()
                .fetch_all(&self.pool)
                .await?;

            snapshot.extend(rows.into_iter().map(|row| (row.id, Item::from(row))));
        }

        debug!(
            requested = unique.len(),
            found = snapshot.len(),
            "Loaded catalog snapshot"
        );

        Ok(snapshot)
    }

    /// Inserts a validated item and returns the stored record.
    pub async fn insert(&self, item: &NewItem) -> DbResult<Item> {
        debug!(name = %item.name, category = %item.category, "Inserting item");

        let id = insert_item(&self.pool, item).await?;

        self.get_any(id)
            .await?
            .ok_or_else(|| crate::DbError::not_found("Item", id))
    }

    /// Writes every mutable field of an active item.
    ///
    /// Returns `false` when the item is missing or soft-deleted.
    pub async fn update(&self, item: &Item) -> DbResult<bool> {
        debug!(id = item.id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = ?2,
                category = ?3,
                price_cents = ?4,
                availability = ?5,
                updated_at = ?6
            WHERE id = ?1 AND status = 'active'
            "#,
        )
        .bind(item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price.cents())
        .bind(item.availability)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Marks an active item as deleted.
    ///
    /// Returns `false` when the item is missing or already deleted.
    pub async fn soft_delete(&self, id: i64) -> DbResult<bool> {
        debug!(id, "Soft-deleting item");

        let result = sqlx::query(
            "UPDATE items SET status = 'deleted', updated_at = ?2 \
             WHERE id = ?1 AND status = 'active'",
        )
        .bind(id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts active items.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn new_item(name: &str, cents: i64) -> NewItem {
        NewItem {
            name: name.to_string(),
            category: "Pizza".to_string(),
            price: Money::from_cents(cents),
            availability: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.items();

        let item = repo.insert(&new_item("Margherita Pizza", 899)).await.unwrap();

        assert!(item.id > 0);
        assert!(item.availability);
        assert_eq!(item.status, RecordStatus::Active);
        assert_eq!(item.price.cents(), 899);

        let fetched = repo.get_active(item.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Margherita Pizza");
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_id() {
        let db = test_db().await;
        let repo = db.items();

        let a = repo.insert(&new_item("Pepperoni Pizza", 1099)).await.unwrap();
        let b = repo.insert(&new_item("Hawaiian Pizza", 1199)).await.unwrap();

        let ids: Vec<i64> = repo
            .list_active()
            .await
            .unwrap()
            .iter()
            .map(|i| i.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id]);
    }

    #[tokio::test]
    async fn test_soft_delete_hides_but_keeps_row() {
        let db = test_db().await;
        let repo = db.items();
        let item = repo.insert(&new_item("Olives", 100)).await.unwrap();

        assert!(repo.soft_delete(item.id).await.unwrap());
        assert!(!repo.soft_delete(item.id).await.unwrap());

        assert!(repo.list_active().await.unwrap().is_empty());
        assert!(repo.get_active(item.id).await.unwrap().is_none());

        let any = repo.get_any(item.id).await.unwrap().unwrap();
        assert_eq!(any.status, RecordStatus::Deleted);
        assert_eq!(repo.count_active().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_writes_fields() {
        let db = test_db().await;
        let repo = db.items();
        let mut item = repo.insert(&new_item("Sprite", 250)).await.unwrap();

        item.price = Money::from_cents(275);
        item.availability = false;
        assert!(repo.update(&item).await.unwrap());

        let stored = repo.get_active(item.id).await.unwrap().unwrap();
        assert_eq!(stored.price.cents(), 275);
        assert!(!stored.availability);
        assert_eq!(stored.created_at, item.created_at);

        repo.soft_delete(item.id).await.unwrap();
        assert!(!repo.update(&item).await.unwrap());
    }

    #[tokio::test]
    async fn test_find_active_by_ids() {
        let db = test_db().await;
        let repo = db.items();
        let a = repo.insert(&new_item("Water", 150)).await.unwrap();
        let b = repo.insert(&new_item("Fanta", 250)).await.unwrap();
        repo.soft_delete(b.id).await.unwrap();

        let found = repo
            .find_active_by_ids(&[a.id, a.id, b.id, 999])
            .await
            .unwrap();

        assert_eq!(found.len(), 1);
        assert!(found.contains_key(&a.id));
        assert!(repo.find_active_by_ids(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_active_by_ids_spans_chunks() {
        let db = test_db().await;
        let repo = db.items();
        let water = repo.insert(&new_item("Water", 150)).await.unwrap();

        let mut ids: Vec<i64> = (1_000..34_000).collect();
        ids.push(water.id);

        let found = repo.find_active_by_ids(&ids).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[&water.id].name, "Water");
    }

    #[tokio::test]
    async fn test_check_constraint_rejects_zero_price() {
        let db = test_db().await;

        let err = db.items().insert(&new_item("Free Pizza", 0)).await.unwrap_err();

        assert!(err.is_constraint());
    }
}
