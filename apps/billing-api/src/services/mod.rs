//! Service layer.
//!
//! Services own the business workflows and sit between the HTTP handlers
//! and the repositories. Each holds a cheap clone of the `Database` handle.
//!
//! - [`catalog::CatalogService`] - item CRUD with merge rules and soft delete
//! - [`invoice::InvoiceService`] - invoice assembly, queries and soft delete

pub mod catalog;
pub mod invoice;

pub use catalog::CatalogService;
pub use invoice::InvoiceService;
