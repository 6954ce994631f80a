//! # Report Repository
//!
//! Sales summaries over committed orders.
//!
//! Dates are calendar days in UTC and both ends of the range are inclusive.
//! The best seller is read from the order line snapshots, so a product that
//! was renamed or deleted after the sale is still reported under the name it
//! was sold with.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{BestSeller, SalesReport};

/// Repository for report queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Report for the current UTC day.
    pub async fn today(&self) -> DbResult<SalesReport> {
        let today = Utc::now().date_naive();
        self.summary(today, today).await
    }

    /// Revenue, order count and best seller between `start` and `end`.
    ///
    /// An inverted range yields an empty report; callers validate first.
    pub async fn summary(&self, start: NaiveDate, end: NaiveDate) -> DbResult<SalesReport> {
        debug!(%start, %end, "Building sales report");

        let (total_revenue, total_transactions): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_amount), 0), COUNT(*)
            FROM orders
            WHERE DATE(created_at) BETWEEN ?1 AND ?2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        // Ties go to the lowest product id. The name is taken from the most
        // recent line for that product.
        let best_seller = sqlx::query_as::<_, BestSeller>(
            r#"
            SELECT
                ol.product_id,
                (SELECT l2.product_name FROM order_lines l2
                 WHERE l2.product_id = ol.product_id
                 ORDER BY l2.id DESC LIMIT 1) AS product_name,
                SUM(ol.quantity) AS quantity_sold
            FROM order_lines ol
            JOIN orders o ON o.id = ol.order_id
            WHERE DATE(o.created_at) BETWEEN ?1 AND ?2
            GROUP BY ol.product_id
            ORDER BY quantity_sold DESC, ol.product_id ASC
            LIMIT 1
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_optional(&self.pool)
        .await?;

        Ok(SalesReport {
            start_date: start,
            end_date: end,
            total_revenue,
            total_transactions,
            best_seller,
        })
    }
}
