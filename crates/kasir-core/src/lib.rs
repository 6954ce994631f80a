//! # kasir-core: Pure Business Logic for Kasir POS
//!
//! This crate is the **heart** of Kasir POS. It contains the checkout rules
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP API (apps/api)                          │   │
//! │  │    /api/produk, /api/checkout, /api/report, ...                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    kasir-db (Database Layer)                    │   │
//! │  │      SQLite queries, migrations, repositories, checkout tx      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ uses                                   │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   draft   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │OrderDraft │  │   rules   │  │   │
//! │  │   │   Order   │  │           │  │PricedLine │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Category, Order, OrderLine, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`draft`] - Order draft: availability checks, line pricing, running total
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::draft::OrderDraft;
//! use kasir_core::{ProductSnapshot, StockPolicy};
//!
//! let coffee = ProductSnapshot {
//!     id: 1,
//!     name: "Kopi Susu".to_string(),
//!     unit_price: 500,
//!     stock_quantity: 10,
//! };
//!
//! let mut draft = OrderDraft::new(StockPolicy::Reject);
//! draft.price_line(&coffee, 3).unwrap();
//! assert_eq!(draft.total().units(), 1500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod draft;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed in a single checkout request.
///
/// ## Business Reason
/// Prevents runaway carts and keeps the checkout transaction short,
/// since it holds the database write lock for its whole duration.
pub const MAX_CHECKOUT_LINES: usize = 100;

/// Maximum quantity of a single checkout line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
