//! # Pricing Engine
//!
//! Turns requested invoice lines into priced lines and invoice totals.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Invoice Pricing                                  │
//! │                                                                         │
//! │  [{item_id: 1, quantity: 2}, {item_id: 2, quantity: 1}]                │
//! │       │                                                                 │
//! │       ▼  non-empty, every quantity ≥ 1?   no → ValidationError         │
//! │       │                                                                 │
//! │       ▼  for each line, in request order                               │
//! │  ┌──────────────────────────────────────────────┐                      │
//! │  │ item in catalog?       no → ItemNotFound     │                      │
//! │  │ item available?        no → ItemUnavailable  │                      │
//! │  │ subtotal = price × quantity                  │                      │
//! │  └──────────────────────────────────────────────┘                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  total       = Σ subtotal                 899×2 + 150 = 1948           │
//! │  tax         = total × rate (half-up)     1948 × 10%  =  195           │
//! │  grand_total = total + tax                              2143           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first failing line aborts pricing; nothing partial is returned.

use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, TaxRate};
use crate::types::{Item, LineRequest};
use crate::validation::validate_lines;
use crate::STANDARD_TAX_RATE;

// =============================================================================
// Catalog Lookup
// =============================================================================

/// Read access to the active catalog, keyed by item id.
///
/// Soft-deleted items must not be returned.
pub trait CatalogLookup {
    fn find(&self, id: i64) -> Option<&Item>;
}

impl CatalogLookup for HashMap<i64, Item> {
    fn find(&self, id: i64) -> Option<&Item> {
        self.get(&id)
    }
}

impl CatalogLookup for [Item] {
    fn find(&self, id: i64) -> Option<&Item> {
        self.iter().find(|item| item.id == id)
    }
}

impl CatalogLookup for Vec<Item> {
    fn find(&self, id: i64) -> Option<&Item> {
        self.as_slice().find(id)
    }
}

// =============================================================================
// Priced Output
// =============================================================================

/// A line with its subtotal fixed at the current unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub item_id: i64,
    pub quantity: i64,
    pub subtotal: Money,
}

/// Fully priced invoice, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedInvoice {
    /// Lines in request order.
    pub lines: Vec<PricedLine>,
    pub total: Money,
    pub tax: Money,
    pub grand_total: Money,
}

// =============================================================================
// Engine
// =============================================================================

/// Applies the flat tax rate to a set of requested lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingEngine {
    tax_rate: TaxRate,
}

impl Default for PricingEngine {
    fn default() -> Self {
        PricingEngine::new(STANDARD_TAX_RATE)
    }
}

impl PricingEngine {
    pub fn new(tax_rate: TaxRate) -> Self {
        PricingEngine { tax_rate }
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Prices the requested lines against the catalog.
    ///
    /// ## Errors
    /// - `Validation` when the list is empty, a quantity is < 1, or a
    ///   subtotal/total overflows
    /// - `ItemNotFound` for an id missing from the catalog
    /// - `ItemUnavailable` for an item with `availability = false`
    ///
    /// The whole list is validated before any catalog lookup; after that,
    /// lines are checked in order and the first failure wins.
    pub fn price<C>(&self, lines: &[LineRequest], catalog: &C) -> CoreResult<PricedInvoice>
    where
        C: CatalogLookup + ?Sized,
    {
        validate_lines(lines)?;

        let mut priced = Vec::with_capacity(lines.len());
        let mut total = Money::zero();

        for line in lines {
            let item = catalog
                .find(line.item_id)
                .ok_or(CoreError::ItemNotFound(line.item_id))?;

            if !item.availability {
                return Err(CoreError::ItemUnavailable {
                    id: item.id,
                    name: item.name.clone(),
                });
            }

            let subtotal = item
                .price
                .checked_mul_quantity(line.quantity)
                .ok_or_else(|| overflow("subtotal"))?;

            total = total.checked_add(subtotal).ok_or_else(|| overflow("total"))?;

            priced.push(PricedLine {
                item_id: item.id,
                quantity: line.quantity,
                subtotal,
            });
        }

        let tax = total.calculate_tax(self.tax_rate);
        let grand_total = total
            .checked_add(tax)
            .ok_or_else(|| overflow("grand_total"))?;

        Ok(PricedInvoice {
            lines: priced,
            total,
            tax,
            grand_total,
        })
    }
}

fn overflow(field: &str) -> CoreError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: Money::MAX.cents(),
    }
    .into()
}

// =============================================================================
// Unit Tests
// =============================================================================
