//! # Error Types
//!
//! Domain-specific error types for pizzeria-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  pizzeria-core errors (this file)                                      │
//! │  ├── CoreError        - Catalog / pricing rule violations              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  pizzeria-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  billing-api errors                                                    │
//! │  └── ApiError         - What HTTP clients see (status + message)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → JSON { "error": … }    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::borrow::Cow;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Catalog item cannot be found.
    ///
    /// ## When This Occurs
    /// - Item ID doesn't exist in the catalog
    /// - Item was soft-deleted
    #[error("Item not found with ID: {0}")]
    ItemNotFound(i64),

    /// Item exists but is not currently sellable.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /api/invoices  { items: [{ item_id: 4, quantity: 1 }] }
    ///      │
    ///      ▼
    /// Item 4 "Veggie Supreme" has availability = false
    ///      │
    ///      ▼
    /// ItemUnavailable { id: 4, name: "Veggie Supreme" }
    ///      │
    ///      ▼
    /// 400 { "error": "Item is not available: Veggie Supreme" }
    /// ```
    #[error("Item is not available: {name}")]
    ItemUnavailable { id: i64, name: String },

    /// Invoice not found (absent or soft-deleted).
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(i64),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
///
/// `field` holds the JSON field name; messages show it as a label
/// (`name` → "Item name", `price` → "Price") since clients display them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{} is required", field_label(.field))]
    Required { field: String },

    /// An invoice request without lines.
    #[error("Invoice must have at least one item")]
    EmptyInvoice,

    /// Field value is too long.
    #[error("{} must be at most {max} characters", field_label(.field))]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{} must be between {min} and {max}", field_label(.field))]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{} must be greater than 0", field_label(.field))]
    MustBePositive { field: String },

    /// Invalid format (e.g., unparseable money amount).
    #[error("{} has invalid format: {reason}", field_label(.field))]
    InvalidFormat { field: String, reason: String },
}

fn field_label(field: &str) -> Cow<'_, str> {
    if field == "name" {
        return Cow::Borrowed("Item name");
    }

    let mut chars = field.chars();
    match chars.next() {
        Some(first) => Cow::Owned(first.to_uppercase().chain(chars).collect()),
        None => Cow::Borrowed(field),
    }
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    pub fn must_be_positive(field: impl Into<String>) -> Self {
        ValidationError::MustBePositive {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
