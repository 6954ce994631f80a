//! # Order Repository
//!
//! Persistence of committed orders and their lines.
//!
//! ## Write Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  (inside the checkout transaction)                                      │
//! │                                                                         │
//! │  create_order(conn, total, created_at) ──► order_id                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  add_line(conn, order_id, 0, line) ──► OrderLine                       │
//! │  add_line(conn, order_id, 1, line) ──► OrderLine                       │
//! │  ...                                                                    │
//! │                                                                         │
//! │  Header first, lines in request order. A failed line insert rolls the  │
//! │  header back with everything else.                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Orders are immutable: there is no update or delete.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use kasir_core::draft::PricedLine;
use kasir_core::{Money, Order, OrderLine};

const SELECT_LINES: &str = r#"
    SELECT id, order_id, position, product_id, product_name, unit_price, quantity, subtotal
    FROM order_lines
    WHERE order_id = ?1
    ORDER BY position
"#;

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    /// Creates a new OrderRepository.
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Gets an order with its lines ordered by position.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(
            "SELECT id, total_amount, created_at FROM orders WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(mut order) = order else {
            return Ok(None);
        };

        order.lines = sqlx::query_as::<_, OrderLine>(SELECT_LINES)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(order))
    }

    /// Counts committed orders (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Unit-of-work operations (checkout)
    // =========================================================================

    /// Inserts the order header inside the caller's transaction.
    ///
    /// ## Returns
    /// The new order id.
    pub async fn create_order(
        conn: &mut SqliteConnection,
        total_amount: Money,
        created_at: DateTime<Utc>,
    ) -> DbResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (total_amount, created_at) VALUES (?1, ?2) RETURNING id",
        )
        .bind(total_amount.units())
        .bind(created_at)
        .fetch_one(&mut *conn)
        .await?;

        debug!(order_id = id, total = %total_amount, "Order header created");
        Ok(id)
    }

    /// Inserts one line inside the caller's transaction.
    ///
    /// ## Snapshot Pattern
    /// Product name and unit price are copied from the priced line.
    /// This preserves the order history even if the product changes later.
    pub async fn add_line(
        conn: &mut SqliteConnection,
        order_id: i64,
        position: i64,
        line: &PricedLine,
    ) -> DbResult<OrderLine> {
        let line = sqlx::query_as::<_, OrderLine>(
            r#"
            INSERT INTO order_lines (
                order_id, position, product_id, product_name, unit_price, quantity, subtotal
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, order_id, position, product_id, product_name, unit_price, quantity, subtotal
            "#,
        )
        .bind(order_id)
        .bind(position)
        .bind(line.product_id)
        .bind(&line.product_name)
        .bind(line.unit_price.units())
        .bind(line.quantity)
        .bind(line.subtotal.units())
        .fetch_one(&mut *conn)
        .await?;

        debug!(order_id, position, product_id = line.product_id, "Order line added");
        Ok(line)
    }
}
