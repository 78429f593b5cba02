//! # Validation Module
//!
//! Input validation for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (HTTP handler / CLI)                                  │
//! │  ├── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Cart shape: non-empty, positive quantities                        │
//! │  └── Catalog input: name, price, stock                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use kasir_core::validation::validate_cart;
//! use kasir_core::CheckoutItem;
//!
//! assert!(validate_cart(&[CheckoutItem::new(1, 2)]).is_ok());
//! assert!(validate_cart(&[]).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{CheckoutItem, NewProduct};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product name accepted by the catalog.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a checkout cart before any store is touched.
///
/// ## Rules
/// - Must contain at least one item
/// - Every quantity must be positive
///
/// Product ids are not checked here; an unknown id is a
/// `ProductNotFound`, not a validation failure.
pub fn validate_cart(items: &[CheckoutItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    for item in items {
        validate_quantity(item.quantity)?;
    }

    Ok(())
}

/// Validates a line quantity.
///
/// ```text
/// validate_quantity(qty)
///      │
///      ├── qty <= 0? → Error: "quantity must be positive"
///      │
///      └── OK → proceed with checkout
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Catalog Validators
// =============================================================================

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "nama".to_string(),
        });
    }

    if name.chars().count() > MAX_PRODUCT_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "nama".to_string(),
            max: MAX_PRODUCT_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a non-negative amount field (`harga`, `stok`).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a new catalog entry.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_non_negative("harga", product.unit_price)?;
    validate_non_negative("stok", product.stock)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cart() {
        assert!(validate_cart(&[CheckoutItem::new(1, 1)]).is_ok());
        assert!(validate_cart(&[CheckoutItem::new(1, 1), CheckoutItem::new(1, 3)]).is_ok());

        assert_eq!(
            validate_cart(&[]),
            Err(ValidationError::Required {
                field: "items".to_string()
            })
        );
        assert!(validate_cart(&[CheckoutItem::new(1, 2), CheckoutItem::new(2, 0)]).is_err());
        assert!(validate_cart(&[CheckoutItem::new(1, -1)]).is_err());
    }

    #[test]
    fn test_unknown_ids_are_not_validation_errors() {
        assert!(validate_cart(&[CheckoutItem::new(-5, 1)]).is_ok());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(1000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_new_product() {
        assert!(validate_new_product(&NewProduct::new("Kecap", 12000, 20)).is_ok());
        assert!(validate_new_product(&NewProduct::new("Gratis", 0, 0)).is_ok());

        assert!(validate_new_product(&NewProduct::new("  ", 100, 1)).is_err());
        assert!(validate_new_product(&NewProduct::new("A".repeat(201), 100, 1)).is_err());
        assert!(validate_new_product(&NewProduct::new("Kecap", -1, 1)).is_err());
        assert!(validate_new_product(&NewProduct::new("Kecap", 100, -1)).is_err());
    }
}
