//! # Domain Types
//!
//! Core domain types used throughout Kasir POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    Product      │   │     Order       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  category_id    │   │  id             │       │
//! │  │  name           │   │  name           │   │  total_amount   │       │
//! │  │  description    │   │  unit_price     │   │  created_at     │       │
//! │  └─────────────────┘   │  stock_quantity │   │  lines ─────┐   │       │
//! │                        └─────────────────┘   └─────────────┼───┘       │
//! │                                                            ▼           │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CheckoutLine   │   │ ProductSnapshot │   │   OrderLine     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │──►│  row seen inside│──►│  name snapshot  │       │
//! │  │  quantity       │   │  the checkout tx│   │  price snapshot │       │
//! │  └─────────────────┘   └─────────────────┘   │  subtotal       │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by a store-assigned `i64`. Order lines additionally
//! carry a `position` that preserves the order of the checkout request.
//!
//! All types serialize with camelCase field names for the HTTP API.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating or replacing a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned identifier.
    pub id: i64,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Price of one unit, in the unit of account.
    pub unit_price: i64,

    /// Units on hand. Never negative under [`StockPolicy::Reject`].
    pub stock_quantity: i64,

    /// Optional category.
    pub category_id: Option<i64>,

    /// Category name, filled by a join on read.
    pub category_name: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_units(self.unit_price)
    }

    /// The fields the checkout pricer needs.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            id: self.id,
            name: self.name.clone(),
            unit_price: self.unit_price,
            stock_quantity: self.stock_quantity,
        }
    }
}

/// Payload for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub unit_price: i64,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub category_id: Option<i64>,
}

/// A product row as read inside the checkout transaction.
///
/// Name and price are copied from here into the order line, so later
/// catalogue edits never change a committed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: i64,
    pub name: String,
    pub unit_price: i64,
    pub stock_quantity: i64,
}

impl ProductSnapshot {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_units(self.unit_price)
    }
}

// =============================================================================
// Checkout Input
// =============================================================================

/// One requested line of a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutLine {
    pub product_id: i64,
    pub quantity: i64,
}

impl CheckoutLine {
    pub const fn new(product_id: i64, quantity: i64) -> Self {
        CheckoutLine {
            product_id,
            quantity,
        }
    }
}

/// Body of `POST /api/checkout`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutLine>,
}

// =============================================================================
// Stock Policy
// =============================================================================

/// What a checkout does when a line asks for more than is on hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockPolicy {
    /// Abort the whole checkout with `InsufficientStock`.
    #[default]
    Reject,
    /// Decrement anyway; stock may go negative.
    AllowBackorder,
}

impl StockPolicy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            StockPolicy::Reject => "reject",
            StockPolicy::AllowBackorder => "backorder",
        }
    }
}

impl fmt::Display for StockPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(StockPolicy::Reject),
            "backorder" | "allow_backorder" => Ok(StockPolicy::AllowBackorder),
            other => Err(ValidationError::InvalidFormat {
                field: "stock_policy".to_string(),
                reason: format!("unknown policy '{other}', expected reject or backorder"),
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A line item in a committed order.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    /// Zero-based index of the line in the checkout request.
    pub position: i64,
    pub product_id: i64,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Unit price at time of sale (frozen).
    pub unit_price: i64,
    pub quantity: i64,
    /// unit_price × quantity.
    pub subtotal: i64,
}

impl OrderLine {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_units(self.subtotal)
    }
}

/// A committed, immutable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    /// Sum of all line subtotals.
    pub total_amount: i64,
    pub created_at: DateTime<Utc>,
    /// Lines ordered by position. Loaded separately from the header row.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub lines: Vec<OrderLine>,
}

impl Order {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_units(self.total_amount)
    }
}

// =============================================================================
// Reports
// =============================================================================

/// Product with the highest quantity sold in a report window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct BestSeller {
    pub product_id: i64,
    pub product_name: String,
    pub quantity_sold: i64,
}

/// Sales summary over an inclusive date range (UTC dates).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_revenue: i64,
    pub total_transactions: i64,
    pub best_seller: Option<BestSeller>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_policy_default() {
        assert_eq!(StockPolicy::default(), StockPolicy::Reject);
    }

    #[test]
    fn test_stock_policy_from_str() {
        assert_eq!("reject".parse::<StockPolicy>().unwrap(), StockPolicy::Reject);
        assert_eq!(
            " Backorder ".parse::<StockPolicy>().unwrap(),
            StockPolicy::AllowBackorder
        );
        assert!("sometimes".parse::<StockPolicy>().is_err());
    }

    #[test]
    fn test_checkout_request_json() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"items":[{"productId":1,"quantity":3},{"productId":1,"quantity":2}]}"#,
        )
        .unwrap();
        assert_eq!(
            req.items,
            vec![CheckoutLine::new(1, 3), CheckoutLine::new(1, 2)]
        );
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let order = Order {
            id: 7,
            total_amount: 1500,
            created_at: Utc::now(),
            lines: vec![OrderLine {
                id: 1,
                order_id: 7,
                position: 0,
                product_id: 3,
                product_name: "Kopi Susu".to_string(),
                unit_price: 500,
                quantity: 3,
                subtotal: 1500,
            }],
        };
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["totalAmount"], 1500);
        assert_eq!(json["lines"][0]["productName"], "Kopi Susu");
        assert_eq!(json["lines"][0]["unitPrice"], 500);
    }

    #[test]
    fn test_new_product_defaults() {
        let p: NewProduct = serde_json::from_str(r#"{"name":"Teh","unitPrice":300}"#).unwrap();
        assert_eq!(p.stock_quantity, 0);
        assert_eq!(p.category_id, None);
    }
}
