//! # Error Types
//!
//! Domain-specific error types for shopledger-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  shopledger-core errors (this file)                                    │
//! │  ├── CoreError        - Business-rule failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  shopledger-db errors (separate crate)                                 │
//! │  ├── DbError          - Storage/infrastructure failures                │
//! │  └── LedgerError      - Core | Db, surfaced by the sale workflow       │
//! │                                                                         │
//! │  Business failures are typed and user-actionable; storage failures     │
//! │  propagate as infrastructure errors and are never converted into       │
//! │  empty business results.                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Quantity;

// =============================================================================
// Core Error
// =============================================================================

/// Business-rule failures.
///
/// Every variant is a distinct, user-actionable condition. These are never
/// silently swallowed: the ledger workflow surfaces them directly.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The product does not exist, is inactive, or belongs to another tenant.
    /// All three cases look identical to the caller on purpose: a foreign
    /// product must not be distinguishable from a missing one.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Requested quantity exceeds the current stock level.
    ///
    /// ## User Workflow
    /// ```text
    /// Record sale (qty: 8.00)
    ///      │
    ///      ▼
    /// Conditional decrement matches no row (stock 7.00 < 8.00)
    ///      │
    ///      ▼
    /// InsufficientStock { name: "Widget", available: 7.00, requested: 8.00 }
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: Quantity,
        requested: Quantity,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before business logic runs, when a request field does not meet
/// the domain rules.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (bad characters, malformed UUID, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            name: "Widget".to_string(),
            available: Quantity::from_hundredths(700),
            requested: Quantity::from_units(8),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Widget: available 7.00, requested 8.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");

        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
