//! # Validation Module
//!
//! Input validation utilities for Kasir POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: business rule validation                        │
//! │  └── Runs before any database access                                   │
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
//! use kasir_core::validation::{validate_checkout_lines, validate_quantity};
//! use kasir_core::CheckoutLine;
//!
//! validate_quantity(5).unwrap();
//! validate_checkout_lines(&[CheckoutLine::new(1, 3)]).unwrap();
//! assert!(validate_checkout_lines(&[]).is_err());
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::types::{CheckoutLine, NewCategory, NewProduct};
use crate::{MAX_CHECKOUT_LINES, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MAX_PRODUCT_NAME_LEN: usize = 200;
const MAX_CATEGORY_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 500;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Indomie Goreng").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a category name (1 to 100 characters).
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name, MAX_CATEGORY_NAME_LEN)
}

fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a name filter for product search.
///
/// ## Returns
/// The trimmed filter, or `None` when it is blank.
pub fn validate_search_query(query: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(query) = query.map(str::trim).filter(|q| !q.is_empty()) else {
        return Ok(None);
    };

    if query.chars().count() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(Some(query.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout line: { productId: 7, quantity: 5 }                          │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → line may enter the checkout transaction                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    validate_quantity_field("quantity", qty)
}

fn validate_quantity_field(field: &str, qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (free items)
///
/// ## Example
/// ```rust
/// use kasir_core::validation::validate_price;
///
/// assert!(validate_price(3500).is_ok());
/// assert!(validate_price(0).is_ok());
/// assert!(validate_price(-100).is_err());
/// ```
pub fn validate_price(price: i64) -> ValidationResult<()> {
    if price < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "unitPrice".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level set through the catalogue.
pub fn validate_stock_quantity(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: "stockQuantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Payload Validators
// =============================================================================

/// Validates a product payload for create or replace.
pub fn validate_new_product(product: &NewProduct) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_price(product.unit_price)?;
    validate_stock_quantity(product.stock_quantity)?;
    Ok(())
}

/// Validates a category payload for create or replace.
pub fn validate_new_category(category: &NewCategory) -> ValidationResult<()> {
    validate_category_name(&category.name)?;

    if let Some(description) = &category.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(ValidationError::TooLong {
                field: "description".to_string(),
                max: MAX_DESCRIPTION_LEN,
            });
        }
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates a checkout request before any storage access.
///
/// ## Rules
/// - At least one line
/// - At most MAX_CHECKOUT_LINES (100) lines
/// - Every quantity passes [`validate_quantity`]
///
/// Errors name the offending line, e.g. `items[2].quantity`.
/// The same product may appear on several lines.
pub fn validate_checkout_lines(lines: &[CheckoutLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        });
    }

    if lines.len() > MAX_CHECKOUT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "items".to_string(),
            min: 1,
            max: MAX_CHECKOUT_LINES as i64,
        });
    }

    for (index, line) in lines.iter().enumerate() {
        validate_quantity_field(&format!("items[{index}].quantity"), line.quantity)?;
    }

    Ok(())
}

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` date parameter.
pub fn parse_report_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        }
    })
}

/// Validates that a report range is not inverted.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> ValidationResult<()> {
    if start > end {
        return Err(ValidationError::InvalidFormat {
            field: "start_date".to_string(),
            reason: format!("{start} is after end_date {end}"),
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
    fn test_validate_product_name() {
        assert!(validate_product_name("Indomie Goreng").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name("   ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_category_name() {
        assert!(validate_category_name("Minuman").is_ok());
        assert!(validate_category_name(&"A".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price_and_stock() {
        assert!(validate_price(0).is_ok());
        assert!(validate_price(-1).is_err());
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_checkout_lines_empty() {
        let err = validate_checkout_lines(&[]).unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "items"));
    }

    #[test]
    fn test_validate_checkout_lines_reports_index() {
        let lines = [
            CheckoutLine::new(1, 3),
            CheckoutLine::new(2, 1),
            CheckoutLine::new(3, 0),
        ];
        let err = validate_checkout_lines(&lines).unwrap_err();
        assert_eq!(err.to_string(), "items[2].quantity must be positive");
    }

    #[test]
    fn test_validate_checkout_lines_too_many() {
        let lines = vec![CheckoutLine::new(1, 1); MAX_CHECKOUT_LINES + 1];
        assert!(matches!(
            validate_checkout_lines(&lines),
            Err(ValidationError::OutOfRange { .. })
        ));

        let lines = vec![CheckoutLine::new(1, 1); MAX_CHECKOUT_LINES];
        assert!(validate_checkout_lines(&lines).is_ok());
    }

    #[test]
    fn test_validate_search_query() {
        assert_eq!(validate_search_query(None).unwrap(), None);
        assert_eq!(validate_search_query(Some("  ")).unwrap(), None);
        assert_eq!(
            validate_search_query(Some(" kopi ")).unwrap(),
            Some("kopi".to_string())
        );
    }

    #[test]
    fn test_report_dates() {
        let start = parse_report_date("start_date", "2026-01-01").unwrap();
        let end = parse_report_date("end_date", "2026-01-31").unwrap();
        assert!(validate_date_range(start, end).is_ok());
        assert!(validate_date_range(end, start).is_err());
        assert!(parse_report_date("start_date", "01/02/2026").is_err());
    }

    #[test]
    fn test_validate_new_category_description() {
        let category = NewCategory {
            name: "Snack".to_string(),
            description: Some("x".repeat(501)),
        };
        assert!(validate_new_category(&category).is_err());
    }
}
