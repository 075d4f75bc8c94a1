//! # Validation Module
//!
//! Input validation rules for catalog and ledger requests.
//!
//! Callers validate before persistence: the database enforces NOT NULL and
//! UNIQUE constraints as a second layer, but these functions give typed,
//! field-level errors first.
//!
//! ## Usage
//! ```rust
//! use shopledger_core::validation::{validate_sku, validate_quantity_hundredths};
//!
//! validate_sku("WID-330").unwrap();
//! validate_quantity_hundredths(250).unwrap(); // 2.50 units
//! ```

use crate::error::ValidationError;
use crate::MAX_SALE_QUANTITY_HUNDREDTHS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Alphanumeric characters, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use shopledger_core::validation::validate_sku;
///
/// assert!(validate_sku("WID-330").is_ok());
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a customer label for a sale.
///
/// The label is free text; only the length is bounded. An absent label is
/// valid and marks an anonymous walk-in transaction.
pub fn validate_customer_label(customer: &str) -> ValidationResult<()> {
    if customer.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "customer".to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a sold quantity in hundredths of a unit.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed [`MAX_SALE_QUANTITY_HUNDREDTHS`]
pub fn validate_quantity_hundredths(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_SALE_QUANTITY_HUNDREDTHS {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_SALE_QUANTITY_HUNDREDTHS,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (zero is allowed: giveaways happen at the counter)
///
/// ## Example
/// ```rust
/// use shopledger_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
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
    fn test_validate_sku() {
        assert!(validate_sku("WID-330").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Widget 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity_hundredths(1).is_ok());
        assert!(validate_quantity_hundredths(250).is_ok());

        assert!(validate_quantity_hundredths(0).is_err());
        assert!(validate_quantity_hundredths(-100).is_err());
        assert!(validate_quantity_hundredths(MAX_SALE_QUANTITY_HUNDREDTHS + 1).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price_cents(0).is_ok());
        assert!(validate_price_cents(999).is_ok());
        assert!(validate_price_cents(-1).is_err());
    }

    #[test]
    fn test_validate_customer_label() {
        assert!(validate_customer_label("Walk-in Joe").is_ok());
        assert!(validate_customer_label(&"c".repeat(201)).is_err());
    }
}
