//! # pizzeria-core: Pure Business Logic for Pizzeria Billing
//!
//! This crate is the **heart** of the billing service. It contains the
//! catalog and invoice domain types and the pricing rules as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Pizzeria Billing Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    billing-api (axum)                           │   │
//! │  │    /api/items ──► CatalogService   /api/invoices ──► Invoice…   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ pizzeria-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │ validation│  │   │
//! │  │   │   Item    │  │   Money   │  │  Engine   │  │   rules   │  │   │
//! │  │   │  Invoice  │  │  TaxRate  │  │  Priced…  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  pizzeria-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Invoice, InvoiceItem, requests)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - The pricing engine: subtotals, tax, grand total
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use pizzeria_core::money::Money;
//! use pizzeria_core::STANDARD_TAX_RATE;
//!
//! let total = Money::from_cents(1948); // $19.48
//! let tax = total.calculate_tax(STANDARD_TAX_RATE);
//!
//! // 10% of $19.48 = $1.948 → rounds half-up to $1.95
//! assert_eq!(tax.cents(), 195);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, TaxRate};
pub use pricing::{CatalogLookup, PricedInvoice, PricedLine, PricingEngine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Flat sales tax applied to every invoice (1000 bps = 10%).
pub const STANDARD_TAX_RATE: TaxRate = TaxRate::from_bps(1000);

/// Maximum accepted length for item names and categories.
pub const MAX_NAME_LENGTH: usize = 200;
