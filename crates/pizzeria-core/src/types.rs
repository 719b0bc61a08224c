//! # Domain Types
//!
//! Core domain types used throughout the billing service.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │    Invoice      │   │  InvoiceItem    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │◄─┐│  date           │──►│  invoice_id     │       │
//! │  │  category       │  ││  total          │   │  item_id        │       │
//! │  │  price          │  ││  tax            │   │  quantity       │       │
//! │  │  availability   │  ││  grand_total    │   │  subtotal       │       │
//! │  └─────────────────┘  │└─────────────────┘   │  item ──────────┼──┐    │
//! │                       │                      └─────────────────┘  │    │
//! │                       └───────────────────────────────────────────┘    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    NewItem      │   │   ItemUpdate    │   │ CreateInvoice…  │       │
//! │  │  (POST body)    │   │  (PUT body)     │   │ (POST body)     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Frozen Subtotals
//! `InvoiceItem.subtotal` is computed once when the invoice is created.
//! Later price or availability edits on the `Item` never touch it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_category, validate_item_name, validate_price};

// =============================================================================
// Record Status
// =============================================================================

/// Lifecycle marker stored on every row.
///
/// Rows are never physically removed; queries select `Active` explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    #[default]
    Active,
    Deleted,
}

impl RecordStatus {
    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, RecordStatus::Active)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A sellable catalog item (pizza, topping, beverage).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    pub id: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Display name shown on the menu and invoice.
    pub name: String,

    /// Menu section: "Pizza", "Topping", "Beverage", ...
    pub category: String,

    #[ts(type = "number")]
    pub price: Money,

    /// Whether the item can currently be put on an invoice.
    pub availability: bool,

    #[serde(skip, default)]
    #[ts(skip)]
    pub status: RecordStatus,
}

impl Item {
    /// Merges a partial update into this item.
    ///
    /// ## Merge Rules
    /// - `name` / `category`: overwrite when present and non-blank
    /// - `price`: overwrite when positive, ignored when zero, rejected when negative
    /// - `availability`: overwrite when present
    ///
    /// Returns `true` when any field changed.
    pub fn apply_update(&mut self, update: ItemUpdate) -> Result<bool, ValidationError> {
        let mut changed = false;

        if let Some(name) = update.name.as_deref().map(str::trim) {
            if !name.is_empty() {
                validate_item_name(name)?;
                changed |= self.name != name;
                self.name = name.to_string();
            }
        }

        if let Some(category) = update.category.as_deref().map(str::trim) {
            if !category.is_empty() {
                validate_category(category)?;
                changed |= self.category != category;
                self.category = category.to_string();
            }
        }

        if let Some(price) = update.price {
            if price.is_negative() {
                return Err(ValidationError::must_be_positive("price"));
            }
            if price.is_positive() {
                changed |= self.price != price;
                self.price = price;
            }
        }

        if let Some(availability) = update.availability {
            changed |= self.availability != availability;
            self.availability = availability;
        }

        Ok(changed)
    }
}

/// Body of `POST /api/items`.
///
/// Missing fields deserialize to empty/zero so that validation produces a
/// field-level message instead of a bare parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewItem {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub category: String,

    #[serde(default)]
    #[ts(type = "number")]
    pub price: Money,

    /// Defaults to `true` when omitted.
    #[serde(default)]
    #[ts(optional)]
    pub availability: Option<bool>,
}

impl NewItem {
    /// Validates the payload and returns it with trimmed strings.
    pub fn validated(self) -> Result<Self, ValidationError> {
        let name = self.name.trim().to_string();
        let category = self.category.trim().to_string();

        validate_item_name(&name)?;
        validate_category(&category)?;
        validate_price(self.price)?;

        Ok(NewItem {
            name,
            category,
            price: self.price,
            availability: self.availability,
        })
    }
}

/// Body of `PUT /api/items/{id}`. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemUpdate {
    #[serde(default)]
    #[ts(optional)]
    pub name: Option<String>,

    #[serde(default)]
    #[ts(optional)]
    pub category: Option<String>,

    #[serde(default)]
    #[ts(as = "Option<f64>")]
    pub price: Option<Money>,

    #[serde(default)]
    #[ts(optional)]
    pub availability: Option<bool>,
}

// =============================================================================
// Invoice
// =============================================================================

/// A finalized bill with its lines and each line's catalog item attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Invoice {
    pub id: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,

    /// Business date of the invoice (defaults to creation time).
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Sum of line subtotals.
    #[ts(type = "number")]
    pub total: Money,

    /// Flat tax on `total`, rounded half-up to the cent.
    #[ts(type = "number")]
    pub tax: Money,

    /// `total + tax`.
    #[ts(type = "number")]
    pub grand_total: Money,

    /// Lines in the order the client submitted them.
    pub invoice_items: Vec<InvoiceItem>,
}

// =============================================================================
// Invoice Item
// =============================================================================

/// A line of an invoice. `subtotal` is frozen at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceItem {
    pub id: i64,
    pub invoice_id: i64,
    pub item_id: i64,
    pub quantity: i64,

    /// quantity × unit price at time of invoicing.
    #[ts(type = "number")]
    pub subtotal: Money,

    /// The referenced catalog item, resolved even when soft-deleted.
    pub item: Item,
}

// =============================================================================
// Invoice Request
// =============================================================================

/// One requested line of a new invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineRequest {
    pub item_id: i64,
    pub quantity: i64,
}

impl LineRequest {
    pub fn new(item_id: i64, quantity: i64) -> Self {
        LineRequest { item_id, quantity }
    }
}

/// Body of `POST /api/invoices`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub items: Vec<LineRequest>,

    /// Optional business date; the creation time is used when omitted.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub date: Option<DateTime<Utc>>,
}

impl CreateInvoiceRequest {
    pub fn new(items: Vec<LineRequest>) -> Self {
        CreateInvoiceRequest { items, date: None }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
