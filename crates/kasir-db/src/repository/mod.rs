//! # Repository Module
//!
//! Database repository implementations for Kasir POS.
//!
//! ## Two Kinds of Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pool-bound methods (&self)            Unit-of-work functions           │
//! │  ───────────────────────────           ──────────────────────────       │
//! │  db.products().list(filter)            ProductRepository::              │
//! │  db.products().get_by_id(id)             resolve_for_update(conn, id)   │
//! │  db.categories().insert(&new)          ProductRepository::              │
//! │  db.orders().get_by_id(id)               decrement_stock(conn, ..)      │
//! │  db.reports().summary(start, end)      OrderRepository::                │
//! │                                          create_order(conn, ..)         │
//! │  Each call checks out its own          OrderRepository::                │
//! │  connection and autocommits.             add_line(conn, ..)             │
//! │                                                                         │
//! │                                        The caller passes the open       │
//! │                                        transaction (`&mut *tx`), so all │
//! │                                        writes commit or roll back as one│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`ProductRepository`](product::ProductRepository) - Product CRUD, lookup and stock decrement
//! - [`CategoryRepository`](category::CategoryRepository) - Category CRUD
//! - [`OrderRepository`](order::OrderRepository) - Order header and line persistence
//! - [`ReportRepository`](report::ReportRepository) - Sales summaries

pub mod category;
pub mod order;
pub mod product;
pub mod report;
