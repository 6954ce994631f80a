//! # kasir-db: Database Layer for Kasir POS
//!
//! This crate provides database access for the Kasir POS backend.
//! It uses SQLite with sqlx for async operations, and owns the checkout
//! transaction.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Data Flow                              │
//! │                                                                         │
//! │  HTTP handler (POST /api/checkout)                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     kasir-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ ProductRepo   │    │ 001_init.sql │  │   │
//! │  │   │ SqlitePool    │◄───│ CategoryRepo  │    │              │  │   │
//! │  │   │               │    │ OrderRepo     │    └──────────────┘  │   │
//! │  │   └───────▲───────┘    │ ReportRepo    │                      │   │
//! │  │           │            └───────▲───────┘                      │   │
//! │  │           │  begin/commit      │ &mut SqliteConnection        │   │
//! │  │   ┌───────┴────────────────────┴──────┐                       │   │
//! │  │   │  CheckoutService (checkout.rs)     │                       │   │
//! │  │   └────────────────────────────────────┘                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (DB_CONN, default ./kasir.db)                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and checkout error types
//! - [`repository`] - Repository implementations (product, category, order, report)
//! - [`checkout`] - The all-or-nothing checkout transaction
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kasir_core::{CheckoutLine, StockPolicy};
//! use kasir_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("kasir.db")).await?;
//!
//! let order = db
//!     .checkout(StockPolicy::Reject)
//!     .checkout(&[CheckoutLine::new(1, 3)])
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod checkout;
pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use checkout::CheckoutService;
pub use error::{CheckoutError, CheckoutResult, DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::category::CategoryRepository;
pub use repository::order::OrderRepository;
pub use repository::product::{ProductRepository, StockDecrement};
pub use repository::report::ReportRepository;
