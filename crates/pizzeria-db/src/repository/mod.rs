//! # Repository Module
//!
//! Database repository implementations for the billing service.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  billing-api service                                                    │
//! │       │                                                                 │
//! │       │  db.items().find_active_by_ids(&[1, 8])                        │
//! │       ▼                                                                 │
//! │  ItemRepository / InvoiceRepository                                    │
//! │       │                                                                 │
//! │       │  SQL, row → domain type mapping                                │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every query names `status = 'active'` explicitly where soft-deleted rows
//! must be hidden.
//!
//! ## Available Repositories
//!
//! - [`ItemRepository`](item::ItemRepository) - Catalog CRUD and snapshots
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoice writes and hydrated reads

pub mod invoice;
pub mod item;
