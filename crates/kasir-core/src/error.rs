//! # Error Types
//!
//! Domain-specific error types for kasir-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kasir-core errors (this file)                                         │
//! │  ├── CoreError        - Checkout rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kasir-db errors (separate crate)                                      │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── CheckoutError    - CoreError (client) | DbError (server)          │
//! │                                                                         │
//! │  HTTP errors (in app)                                                  │
//! │  └── ApiError         - What the client sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CheckoutError → ApiError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every message names the product id, field or line index it is about, so
//! the HTTP layer can pass `to_string()` straight to the client.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// Every variant is a client-side failure: the request itself cannot be
/// fulfilled. Storage failures live in `kasir-db`.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product referenced by a checkout line does not exist.
    ///
    /// ## When This Occurs
    /// - Product ID was never created
    /// - Product was deleted between browsing and checkout
    #[error("Product not found: {0}")]
    ProductNotFound(i64),

    /// Insufficient stock to complete the checkout.
    ///
    /// ## User Workflow
    /// ```text
    /// Checkout line (qty: 5)
    ///      │
    ///      ▼
    /// Check stock inside the transaction: available=3
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 7, name: "Kopi", available: 3, requested: 5 }
    ///      │
    ///      ▼
    /// Whole checkout rolls back, client sees "only 3 in stock"
    /// ```
    #[error("Insufficient stock for product {product_id} ({name}): available {available}, requested {requested}")]
    InsufficientStock {
        product_id: i64,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Line subtotal or order total does not fit the unit of account.
    #[error("Amount overflow pricing product {product_id} x {quantity}")]
    AmountOverflow { product_id: i64, quantity: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Product ID this error refers to, if any.
    pub fn product_id(&self) -> Option<i64> {
        match self {
            CoreError::ProductNotFound(id) => Some(*id),
            CoreError::InsufficientStock { product_id, .. }
            | CoreError::AmountOverflow { product_id, .. } => Some(*product_id),
            CoreError::Validation(_) => None,
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Raised before any database access, so they never cause a rollback.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., unparseable date).
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
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            product_id: 7,
            name: "Kopi Susu".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product 7 (Kopi Susu): available 3, requested 5"
        );

        assert_eq!(
            CoreError::ProductNotFound(999).to_string(),
            "Product not found: 999"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "items".to_string(),
        };
        assert_eq!(err.to_string(), "items is required");

        let err = ValidationError::MustBePositive {
            field: "items[2].quantity".to_string(),
        };
        assert_eq!(err.to_string(), "items[2].quantity must be positive");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "items".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(core_err.product_id(), None);
    }

    #[test]
    fn test_product_id_is_reported() {
        assert_eq!(CoreError::ProductNotFound(42).product_id(), Some(42));
        let err = CoreError::AmountOverflow {
            product_id: 5,
            quantity: 2,
        };
        assert_eq!(err.product_id(), Some(5));
    }
}
