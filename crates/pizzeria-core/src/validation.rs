//! # Validation Module
//!
//! Input validation utilities for the billing service.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extraction (axum)                                       │
//! │  ├── Malformed JSON, wrong field types                                 │
//! │  └── Non-integer path ids                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required fields, lengths                                          │
//! │  └── Positive prices and quantities                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use pizzeria_core::validation::{validate_item_name, validate_quantity};
//!
//! validate_item_name("Margherita Pizza").unwrap();
//! validate_quantity(2).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::LineRequest;
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound for a configured tax rate (100%).
pub const MAX_TAX_RATE_BPS: u32 = 10_000;

// =============================================================================
// String Validators
// =============================================================================

fn validate_label(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }

    Ok(())
}

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most `MAX_NAME_LENGTH` characters
///
/// ## Example
/// ```rust
/// use pizzeria_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Pepperoni Pizza").is_ok());
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    validate_label("name", name)
}

/// Validates an item category. Same rules as names.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    validate_label("category", category)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a catalog price. Must be positive and at most `Money::MAX`.
///
/// ```rust
/// use pizzeria_core::{validation::validate_price, Money};
///
/// assert!(validate_price(Money::from_cents(899)).is_ok());
/// assert!(validate_price(Money::zero()).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if !price.is_positive() {
        return Err(ValidationError::must_be_positive("price"));
    }
    if price > Money::MAX {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 1,
            max: Money::MAX.cents(),
        });
    }

    Ok(())
}

/// Validates a line quantity. Must be at least 1.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::must_be_positive("quantity"));
    }

    Ok(())
}

/// Validates a tax rate in basis points (0 to 10000).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > MAX_TAX_RATE_BPS {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: MAX_TAX_RATE_BPS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the requested invoice lines.
///
/// ## Rules
/// - At least one line
/// - Every quantity ≥ 1
///
/// Item existence and availability are checked later by the pricing
/// engine, which needs the catalog.
pub fn validate_lines(lines: &[LineRequest]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::EmptyInvoice);
    }

    for line in lines {
        validate_quantity(line.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_item_name() {
        assert!(validate_item_name("Margherita Pizza").is_ok());
        assert!(validate_item_name("Jalapeños").is_ok());

        assert_eq!(
            validate_item_name("").unwrap_err(),
            ValidationError::required("name")
        );
        assert!(validate_item_name("   ").is_err());
        assert!(validate_item_name(&"A".repeat(MAX_NAME_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Beverage").is_ok());
        assert_eq!(
            validate_category("").unwrap_err(),
            ValidationError::required("category")
        );
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::from_cents(1)).is_ok());
        assert!(validate_price(Money::zero()).is_err());
        assert!(validate_price(Money::from_cents(-100)).is_err());

        assert!(validate_price(Money::MAX).is_ok());
        assert!(matches!(
            validate_price(Money::from_cents(Money::MAX.cents() + 1)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(250).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_lines() {
        assert!(validate_lines(&[LineRequest::new(1, 2)]).is_ok());

        assert_eq!(
            validate_lines(&[]).unwrap_err(),
            ValidationError::EmptyInvoice
        );
        assert_eq!(
            validate_lines(&[LineRequest::new(1, 1), LineRequest::new(2, 0)]).unwrap_err(),
            ValidationError::must_be_positive("quantity")
        );
    }

    #[test]
    fn test_validate_tax_rate_bps() {
        assert!(validate_tax_rate_bps(0).is_ok());
        assert!(validate_tax_rate_bps(1000).is_ok());
        assert!(validate_tax_rate_bps(10_000).is_ok());
        assert!(validate_tax_rate_bps(10_001).is_err());
    }
}
