//! # Order Draft
//!
//! Pure pricing of a checkout while it is in flight.
//!
//! ## Where the Draft Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CheckoutService (kasir-db, owns the transaction)                       │
//! │                                                                         │
//! │  for each CheckoutLine:                                                │
//! │      resolve_for_update(product_id) ──► ProductSnapshot                │
//! │                │                                                        │
//! │                ▼                                                        │
//! │      OrderDraft::price_line(&snapshot, qty) ← THIS MODULE              │
//! │                │   stock check (StockPolicy)                            │
//! │                │   subtotal = unit_price × qty                          │
//! │                │   total += subtotal                                    │
//! │                ▼                                                        │
//! │      decrement_stock(product_id, qty)                                  │
//! │                                                                         │
//! │  create_order(draft.total()) then add_line(position, line) per line    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The draft never touches storage. The snapshot it prices against must be
//! read inside the same transaction that later decrements the stock.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{ProductSnapshot, StockPolicy};

/// A priced checkout line, ready to be persisted as an order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    /// Name at the moment of pricing (frozen into the order line).
    pub product_name: String,
    /// Unit price at the moment of pricing (frozen into the order line).
    pub unit_price: Money,
    pub quantity: i64,
    pub subtotal: Money,
}

/// Accumulates priced lines and the running total of one checkout.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    policy: StockPolicy,
    lines: Vec<PricedLine>,
    total: Money,
}

impl OrderDraft {
    pub fn new(policy: StockPolicy) -> Self {
        OrderDraft {
            policy,
            lines: Vec::new(),
            total: Money::zero(),
        }
    }

    /// Checks availability, prices the line and adds it to the running total.
    ///
    /// ## Errors
    /// - `InsufficientStock` when `quantity` exceeds the snapshot's stock
    ///   under [`StockPolicy::Reject`]
    /// - `AmountOverflow` when the subtotal or total leaves the i64 range
    ///
    /// On error the draft is unchanged.
    pub fn price_line(&mut self, product: &ProductSnapshot, quantity: i64) -> CoreResult<&PricedLine> {
        if self.policy == StockPolicy::Reject && product.stock_quantity < quantity {
            return Err(CoreError::InsufficientStock {
                product_id: product.id,
                name: product.name.clone(),
                available: product.stock_quantity,
                requested: quantity,
            });
        }

        let overflow = || CoreError::AmountOverflow {
            product_id: product.id,
            quantity,
        };
        let subtotal = product
            .price()
            .checked_multiply_quantity(quantity)
            .ok_or_else(overflow)?;
        let total = self.total.checked_add(subtotal).ok_or_else(overflow)?;

        self.total = total;
        self.lines.push(PricedLine {
            product_id: product.id,
            product_name: product.name.clone(),
            unit_price: product.price(),
            quantity,
            subtotal,
        });

        // Just pushed, so the vector is non-empty.
        Ok(&self.lines[self.lines.len() - 1])
    }

    #[inline]
    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    /// Sum of all priced subtotals.
    #[inline]
    pub fn total(&self) -> Money {
        self.total
    }

    #[inline]
    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<PricedLine> {
        self.lines
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
