//! # Catalog Seeding
//!
//! Populates an empty catalog with the default menu on startup.
//!
//! ## Behavior
//! - Runs only when the `items` table has no rows at all (deleted rows count)
//! - Inserts the whole menu in one transaction
//! - Safe to call on every start

use tracing::info;

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::item::insert_item;
use pizzeria_core::{Money, NewItem};

/// Default menu: (name, category, price in cents).
pub const DEFAULT_MENU: &[(&str, &str, i64)] = &[
    // Pizzas
    ("Margherita Pizza", "Pizza", 899),
    ("Pepperoni Pizza", "Pizza", 1099),
    ("Hawaiian Pizza", "Pizza", 1199),
    ("Veggie Supreme", "Pizza", 1199),
    ("BBQ Chicken Pizza", "Pizza", 1299),
    ("Meat Lovers Pizza", "Pizza", 1399),
    ("Four Cheese Pizza", "Pizza", 1099),
    // Toppings
    ("Extra Cheese", "Topping", 150),
    ("Mushrooms", "Topping", 100),
    ("Olives", "Topping", 100),
    ("Peppers", "Topping", 100),
    ("Onions", "Topping", 75),
    ("Jalapeños", "Topping", 125),
    // Beverages
    ("Coca Cola", "Beverage", 250),
    ("Sprite", "Beverage", 250),
    ("Fanta", "Beverage", 250),
    ("Water", "Beverage", 150),
    ("Iced Tea", "Beverage", 275),
];

/// Seeds the default menu when the catalog has no active items.
///
/// Returns the number of items inserted (0 when active items already exist).
pub async fn seed_catalog(db: &Database) -> DbResult<usize> {
    let existing = db.items().count_active().await?;
    if existing > 0 {
        info!(existing, "Catalog already populated, skipping seed");
        return Ok(0);
    }

    let mut tx = db.pool().begin().await?;

    for (name, category, cents) in DEFAULT_MENU {
        let item = NewItem {
            name: name.to_string(),
            category: category.to_string(),
            price: Money::from_cents(*cents),
            availability: Some(true),
        };
        insert_item(&mut *tx, &item).await?;
    }

    tx.commit().await?;

    info!(count = DEFAULT_MENU.len(), "Seeded default menu");
    Ok(DEFAULT_MENU.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DbConfig;

    #[tokio::test]
    async fn test_seed_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert_eq!(seed_catalog(&db).await.unwrap(), DEFAULT_MENU.len());
        assert_eq!(seed_catalog(&db).await.unwrap(), 0);

        let items = db.items().list_active().await.unwrap();
        assert_eq!(items.len(), 18);
        assert_eq!(items[0].name, "Margherita Pizza");
        assert_eq!(items[0].price.cents(), 899);
        assert!(items.iter().all(|i| i.availability));
    }

    #[tokio::test]
    async fn test_seed_refills_when_every_item_was_deleted() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let item = db
            .items()
            .insert(&NewItem {
                name: "Calzone".to_string(),
                category: "Pizza".to_string(),
                price: Money::from_cents(1299),
                availability: None,
            })
            .await
            .unwrap();
        db.items().soft_delete(item.id).await.unwrap();

        assert_eq!(seed_catalog(&db).await.unwrap(), DEFAULT_MENU.len());

        let items = db.items().list_active().await.unwrap();
        assert_eq!(items.len(), DEFAULT_MENU.len());
        assert!(items.iter().all(|i| i.id != item.id));
    }
}
