//! # Checkout Service
//!
//! Turns a multi-line cart into a committed order, or into nothing at all.
//!
//! ## Checkout Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         checkout(lines)                                 │
//! │                                                                         │
//! │  validate_checkout_lines ── invalid ──► Rejected (no transaction)      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────────────┐      │
//! │  │  for each line, in request order:                            │      │
//! │  │      resolve_for_update ── missing ──► ProductNotFound ──────┤      │
//! │  │      OrderDraft::price_line ── short ──► InsufficientStock ──┤      │
//! │  │      decrement_stock ── guard refused ──► InsufficientStock ─┤      │
//! │  │                                                              │      │
//! │  │  create_order(total)                                         │      │
//! │  │  add_line × N                                                │      │
//! │  COMMIT                                                  ROLLBACK (drop)│
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Order { id, total_amount, lines }                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every early return drops the `sqlx::Transaction`, which rolls back and
//! hands the connection back to the pool. Nothing is retried.
//!
//! ## Concurrency
//! The first statement inside the transaction is a write
//! (`resolve_for_update`), so concurrent checkouts queue on SQLite's write
//! lock. The second one sees the first one's committed stock.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{error, info, warn};

use kasir_core::draft::OrderDraft;
use kasir_core::validation::validate_checkout_lines;
use kasir_core::{CheckoutLine, CoreError, Order, StockPolicy};

use crate::error::{CheckoutError, CheckoutResult, DbError};
use crate::repository::order::OrderRepository;
use crate::repository::product::{ProductRepository, StockDecrement};

/// Commits checkouts against one pool under one stock policy.
///
/// ## Usage
/// ```rust,ignore
/// let service = db.checkout(StockPolicy::Reject);
/// let order = service
///     .checkout(&[CheckoutLine::new(1, 3), CheckoutLine::new(1, 2)])
///     .await?;
/// assert_eq!(order.lines.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CheckoutService {
    pool: SqlitePool,
    policy: StockPolicy,
}

impl CheckoutService {
    pub fn new(pool: SqlitePool, policy: StockPolicy) -> Self {
        CheckoutService { pool, policy }
    }

    pub fn policy(&self) -> StockPolicy {
        self.policy
    }

    /// Validates, prices and commits `lines` as one order.
    ///
    /// ## Errors
    /// - `CheckoutError::Rejected` - invalid input, unknown product,
    ///   insufficient stock or amount overflow
    /// - `CheckoutError::Storage` - the store failed; nothing was committed
    pub async fn checkout(&self, lines: &[CheckoutLine]) -> CheckoutResult<Order> {
        let result = self.run(lines).await;

        match &result {
            Ok(order) => info!(
                order_id = order.id,
                total = order.total_amount,
                lines = order.lines.len(),
                "Checkout committed"
            ),
            Err(CheckoutError::Rejected(err)) => warn!(
                product_id = ?err.product_id(),
                error = %err,
                "Checkout rejected"
            ),
            Err(CheckoutError::Storage(err)) => error!(error = %err, "Checkout failed"),
        }

        result
    }

    async fn run(&self, lines: &[CheckoutLine]) -> CheckoutResult<Order> {
        validate_checkout_lines(lines)?;

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;
        let mut draft = OrderDraft::new(self.policy);

        for line in lines {
            let product = ProductRepository::resolve_for_update(&mut *tx, line.product_id)
                .await?
                .ok_or(CoreError::ProductNotFound(line.product_id))?;

            draft.price_line(&product, line.quantity)?;

            let outcome =
                ProductRepository::decrement_stock(&mut *tx, line.product_id, line.quantity, self.policy)
                    .await?;
            match outcome {
                StockDecrement::Applied { .. } => {}
                StockDecrement::Insufficient { available } => {
                    return Err(CoreError::InsufficientStock {
                        product_id: product.id,
                        name: product.name,
                        available,
                        requested: line.quantity,
                    }
                    .into());
                }
                StockDecrement::NotFound => {
                    return Err(CoreError::ProductNotFound(line.product_id).into());
                }
            }
        }

        let created_at = Utc::now();
        let order_id = OrderRepository::create_order(&mut *tx, draft.total(), created_at).await?;

        let mut order_lines = Vec::with_capacity(draft.lines().len());
        for (position, line) in draft.lines().iter().enumerate() {
            let saved = OrderRepository::add_line(&mut *tx, order_id, position as i64, line).await?;
            order_lines.push(saved);
        }

        tx.commit().await.map_err(DbError::transaction)?;

        Ok(Order {
            id: order_id,
            total_amount: draft.total().units(),
            created_at,
            lines: order_lines,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kasir_core::{NewProduct, ValidationError};
    use std::time::Duration;
    use uuid::Uuid;

    async fn seed_product(db: &Database, name: &str, unit_price: i64, stock_quantity: i64) -> i64 {
        db.products()
            .insert(&NewProduct {
                name: name.to_string(),
                unit_price,
                stock_quantity,
                category_id: None,
            })
            .await
            .unwrap()
            .id
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products()
            .get_by_id(id)
            .await
            .unwrap()
            .unwrap()
            .stock_quantity
    }

    #[tokio::test]
    async fn test_two_lines_same_product() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seed_product(&db, "Kopi Susu", 500, 10).await;

        let order = db
            .checkout(StockPolicy::Reject)
            .checkout(&[CheckoutLine::new(p, 3), CheckoutLine::new(p, 2)])
            .await
            .unwrap();

        assert_eq!(order.total_amount, 2500);
        let subtotals: Vec<i64> = order.lines.iter().map(|l| l.subtotal).collect();
        assert_eq!(subtotals, vec![1500, 1000]);
        assert_eq!(stock_of(&db, p).await, 5);

        let stored = db.orders().get_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(stored.total_amount, 2500);
        assert_eq!(stored.lines, order.lines);
    }

    #[tokio::test]
    async fn test_total_matches_lines_across_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kopi = seed_product(&db, "Kopi Susu", 500, 10).await;
        let teh = seed_product(&db, "Teh Manis", 300, 10).await;

        let order = db
            .checkout(StockPolicy::Reject)
            .checkout(&[CheckoutLine::new(teh, 4), CheckoutLine::new(kopi, 1)])
            .await
            .unwrap();

        let sum: i64 = order.lines.iter().map(|l| l.subtotal).sum();
        assert_eq!(order.total_amount, sum);
        for line in &order.lines {
            assert_eq!(line.subtotal, line.unit_price * line.quantity);
        }
        assert_eq!(order.lines[0].product_id, teh);
        assert_eq!(order.lines[0].position, 0);
        assert_eq!(stock_of(&db, teh).await, 6);
        assert_eq!(stock_of(&db, kopi).await, 9);
    }

    #[tokio::test]
    async fn test_unknown_product_leaves_no_trace() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seed_product(&db, "Kopi Susu", 500, 10).await;

        let err = db
            .checkout(StockPolicy::Reject)
            .checkout(&[CheckoutLine::new(p, 3), CheckoutLine::new(999, 1)])
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            CheckoutError::Rejected(CoreError::ProductNotFound(999))
        ));
        assert_eq!(stock_of(&db, p).await, 10);
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_insufficient_stock_leaves_no_trace() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let kopi = seed_product(&db, "Kopi Susu", 500, 10).await;
        let teh = seed_product(&db, "Teh Manis", 300, 2).await;

        let err = db
            .checkout(StockPolicy::Reject)
            .checkout(&[CheckoutLine::new(kopi, 4), CheckoutLine::new(teh, 3)])
            .await
            .unwrap_err();

        match err {
            CheckoutError::Rejected(CoreError::InsufficientStock {
                product_id,
                available,
                requested,
                ..
            }) => {
                assert_eq!(product_id, teh);
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(stock_of(&db, kopi).await, 10);
        assert_eq!(stock_of(&db, teh).await, 2);
        assert_eq!(db.orders().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_repeated_product_exceeding_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seed_product(&db, "Kopi Susu", 500, 4).await;

        // Each line fits on its own; together they do not.
        let err = db
            .checkout(StockPolicy::Reject)
            .checkout(&[CheckoutLine::new(p, 3), CheckoutLine::new(p, 2)])
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(stock_of(&db, p).await, 4);
    }

    #[tokio::test]
    async fn test_backorder_policy_allows_negative_stock() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seed_product(&db, "Kopi Susu", 500, 1).await;

        let order = db
            .checkout(StockPolicy::AllowBackorder)
            .checkout(&[CheckoutLine::new(p, 3)])
            .await
            .unwrap();

        assert_eq!(order.total_amount, 1500);
        assert_eq!(stock_of(&db, p).await, -2);
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_before_storage() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let service = db.checkout(StockPolicy::Reject);

        let err = service.checkout(&[]).await.unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Rejected(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let err = service
            .checkout(&[CheckoutLine::new(999, 0)])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::Rejected(CoreError::Validation(
                ValidationError::MustBePositive { .. }
            ))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_survives_product_changes() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seed_product(&db, "Kopi Susu", 500, 10).await;

        let order = db
            .checkout(StockPolicy::Reject)
            .checkout(&[CheckoutLine::new(p, 1)])
            .await
            .unwrap();

        db.products()
            .update(
                p,
                &NewProduct {
                    name: "Kopi Susu Gula Aren".to_string(),
                    unit_price: 800,
                    stock_quantity: 9,
                    category_id: None,
                },
            )
            .await
            .unwrap();
        db.products().delete(p).await.unwrap();

        let stored = db.orders().get_by_id(order.id).await.unwrap().unwrap();
        assert_eq!(stored.lines[0].product_name, "Kopi Susu");
        assert_eq!(stored.lines[0].unit_price, 500);
    }

    #[tokio::test]
    async fn test_storage_failure_is_not_a_client_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let p = seed_product(&db, "Kopi Susu", 500, 10).await;
        db.close().await;

        let err = db
            .checkout(StockPolicy::Reject)
            .checkout(&[CheckoutLine::new(p, 1)])
            .await
            .unwrap_err();
        assert!(!err.is_client_error());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_checkouts_do_not_oversell() {
        let path = std::env::temp_dir().join(format!("kasir-{}.db", Uuid::new_v4()));
        let config = DbConfig::new(&path)
            .max_connections(4)
            .busy_timeout(Duration::from_secs(10));
        let db = Database::new(config).await.unwrap();
        let p = seed_product(&db, "Kopi Susu", 500, 5).await;

        let first = db.checkout(StockPolicy::Reject);
        let second = db.checkout(StockPolicy::Reject);
        let lines = [CheckoutLine::new(p, 5)];

        let (a, b) = tokio::join!(
            tokio::spawn(async move { first.checkout(&lines).await }),
            tokio::spawn(async move { second.checkout(&lines).await }),
        );
        let results = [a.unwrap(), b.unwrap()];

        let committed = results.iter().filter(|r| r.is_ok()).count();
        assert_eq!(committed, 1);
        assert!(results.iter().any(|r| matches!(
            r,
            Err(CheckoutError::Rejected(CoreError::InsufficientStock { .. }))
        )));
        assert_eq!(stock_of(&db, p).await, 0);
        assert_eq!(db.orders().count().await.unwrap(), 1);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
        }
    }
}
