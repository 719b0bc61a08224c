//! # pizzeria-db: Database Layer for Pizzeria Billing
//!
//! This crate provides storage for the billing service.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Billing Data Flow                                 │
//! │                                                                         │
//! │  HTTP handler (POST /api/invoices)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   pizzeria-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ItemRepo      │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │◄───│ InvoiceRepo   │    │ _schema.sql  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                  pizzeria.db / in-memory                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Item and invoice repositories
//! - [`seed`] - Default menu seeding
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pizzeria_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("sqlite://pizzeria.db?mode=rwc")).await?;
//! pizzeria_db::seed::seed_catalog(&db).await?;
//!
//! let menu = db.items().list_active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, IN_MEMORY_URL};
pub use seed::seed_catalog;

pub use repository::invoice::InvoiceRepository;
pub use repository::item::ItemRepository;
