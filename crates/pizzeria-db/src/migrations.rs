//! # Database Migrations
//!
//! Embedded SQL migrations for the billing database.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Name format: `NNN_description.sql` (e.g., `002_add_discounts.sql`)
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/sqlite` directory.
///
/// ```text
/// migrations/sqlite/
/// └── 001_initial_schema.sql  # items, invoices, invoice_items
/// ```
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Each migration runs in its own transaction and is recorded in
/// `_sqlx_migrations`, so repeated calls are no-ops.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!(
        available = MIGRATOR.migrations.len(),
        "Checking for pending migrations"
    );

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}
