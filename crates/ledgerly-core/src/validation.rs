//! # Validation Module
//!
//! Input validation for line-item edits.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form inputs (frontend)                                        │
//! │  ├── min/max on number inputs (discount 0–100, ...)                    │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: ledgerly-forms                                               │
//! │  └── THIS MODULE: called before an edit is applied                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Pricing engine: no validation, never fails                            │
//! │  (mid-edit rows are priced as they are)                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ledgerly_core::validation::{validate_quantity, validate_tax_percentage};
//! use rust_decimal::Decimal;
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_tax_percentage(Decimal::new(15, 0)).is_ok());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::DiscountType;
use crate::{MAX_DOCUMENT_ITEMS, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a product reference.
///
/// ## Rules
/// - Must not be empty or whitespace
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "productId".to_string(),
        });
    }

    Ok(())
}

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit rate. Zero is allowed (free items).
pub fn validate_rate(rate: Decimal) -> ValidationResult<()> {
    if rate < Decimal::ZERO {
        return Err(ValidationError::MustNotBeNegative {
            field: "rate".to_string(),
        });
    }

    Ok(())
}

/// Validates a discount magnitude for its type.
///
/// ## Rules
/// - Percentage: 0 to 100
/// - Fixed: not negative
///
/// ## Example
/// ```rust
/// use ledgerly_core::validation::validate_discount;
/// use ledgerly_core::DiscountType;
/// use rust_decimal::Decimal;
///
/// assert!(validate_discount(DiscountType::Percentage, Decimal::new(10, 0)).is_ok());
/// assert!(validate_discount(DiscountType::Percentage, Decimal::new(101, 0)).is_err());
/// assert!(validate_discount(DiscountType::Fixed, Decimal::new(250, 0)).is_ok());
/// ```
pub fn validate_discount(kind: DiscountType, magnitude: Decimal) -> ValidationResult<()> {
    match kind {
        DiscountType::Percentage => validate_percentage("discount", magnitude),
        DiscountType::Fixed => {
            if magnitude < Decimal::ZERO {
                return Err(ValidationError::MustNotBeNegative {
                    field: "discount".to_string(),
                });
            }
            Ok(())
        }
    }
}

/// Validates a tax percentage (0% to 100%).
pub fn validate_tax_percentage(percent: Decimal) -> ValidationResult<()> {
    validate_percentage("tax", percent)
}

fn validate_percentage(field: &str, percent: Decimal) -> ValidationResult<()> {
    if percent < Decimal::ZERO || percent > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Validates that one more line fits on a document.
///
/// ## Rules
/// - Must not exceed MAX_DOCUMENT_ITEMS
pub fn validate_item_count(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_DOCUMENT_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 0,
            max: MAX_DOCUMENT_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
