//! # Pizzeria Billing API
//!
//! HTTP/JSON server for the pizza billing frontend.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Billing API Services                            │
//! │                                                                         │
//! │  ┌────────────────────────┐        ┌────────────────────────────────┐  │
//! │  │  CatalogService        │        │  InvoiceService                │  │
//! │  │                        │        │                                │  │
//! │  │ • list_items           │        │ • create_invoice               │  │
//! │  │ • create_item          │        │ • list_invoices                │  │
//! │  │ • update_item          │        │ • get_invoice                  │  │
//! │  │ • delete_item          │        │ • delete_invoice               │  │
//! │  └───────────┬────────────┘        └───────────────┬────────────────┘  │
//! │              │                                     │                   │
//! │              │          ┌──────────────────┐       │                   │
//! │              │          │  PricingEngine   │◄──────┤                   │
//! │              │          │  (pizzeria-core) │       │                   │
//! │              │          └──────────────────┘       │                   │
//! │              ▼                                     ▼                   │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                  Database (pizzeria-db, SQLite)                  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables (see [`config::AppConfig`]):
//! - `DATABASE_URL` - SQLite URL (fallback: `DB_DIR` / `DB_NAME`)
//! - `PORT` - listen port (default: 8080)
//! - `BIND_ADDR` - listen address (default: 0.0.0.0)
//! - `FRONTEND_URL` - extra CORS origins, comma separated
//! - `TAX_RATE_BPS` - invoice tax in basis points (default: 1000)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `SEED_CATALOG` - seed the default menu into an empty catalog (default: true)
//! - `RUST_LOG` - log filter (default: info)

pub mod config;
pub mod error;
pub mod routes;
pub mod services;

use pizzeria_core::PricingEngine;
use pizzeria_db::Database;

use crate::services::{CatalogService, InvoiceService};

// Re-exports
pub use config::AppConfig;
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;

/// Shared application state, cloned into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub catalog: CatalogService,
    pub invoices: InvoiceService,
}

impl AppState {
    pub fn new(db: Database, engine: PricingEngine) -> Self {
        AppState {
            catalog: CatalogService::new(db.clone()),
            invoices: InvoiceService::new(db.clone(), engine),
            db,
        }
    }
}
