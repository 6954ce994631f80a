//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Catalogue CRUD with an optional name filter
//! - In-transaction lookup and stock decrement for checkout
//!
//! ## Stock Update Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                                                                     │
//! │  ❌ WRONG: read, compute in Rust, write back                        │
//! │     SELECT stock_quantity ...      -- 10                            │
//! │     UPDATE products SET stock_quantity = 7                          │
//! │     (a concurrent checkout's decrement is lost)                     │
//! │                                                                     │
//! │  ✅ CORRECT: relative update evaluated by the store                 │
//! │     UPDATE products SET stock_quantity = stock_quantity - 3         │
//! │     WHERE id = ? AND stock_quantity >= 3                            │
//! │                                                                     │
//! │  Zero rows touched? Follow-up read tells NotFound from Insufficient │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::{NewProduct, Product, ProductSnapshot, StockPolicy};

const SELECT_PRODUCT: &str = r#"
    SELECT
        p.id,
        p.name,
        p.unit_price,
        p.stock_quantity,
        p.category_id,
        c.name AS category_name,
        p.created_at,
        p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Outcome of a stock decrement inside the checkout transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockDecrement {
    /// Stock was reduced; `remaining` is the new level.
    Applied { remaining: i64 },
    /// The guard refused: only `available` units are on hand.
    Insufficient { available: i64 },
    /// No product with that id.
    NotFound,
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let all = repo.list(None).await?;
/// let kopi = repo.list(Some("kopi")).await?;
/// let product = repo.get_by_id(7).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists products ordered by id, optionally filtered by name.
    ///
    /// The filter is a substring match. SQLite `LIKE` is case-insensitive
    /// for ASCII, so "kopi" finds "Kopi Susu".
    pub async fn list(&self, name_filter: Option<&str>) -> DbResult<Vec<Product>> {
        debug!(filter = ?name_filter, "Listing products");

        let sql = format!(
            "{SELECT_PRODUCT} WHERE (?1 IS NULL OR p.name LIKE '%' || ?1 || '%') ORDER BY p.id"
        );
        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(name_filter)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("{SELECT_PRODUCT} WHERE p.id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with its assigned id
    /// * `Err(DbError::ForeignKeyViolation)` - `category_id` does not exist
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(name = %product.name, "Inserting product");

        let now = Utc::now();
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO products (
                name, unit_price, stock_quantity, category_id, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING id
            "#,
        )
        .bind(product.name.trim())
        .bind(product.unit_price)
        .bind(product.stock_quantity)
        .bind(product.category_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Replaces the editable fields of an existing product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Updated product
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<Product> {
        debug!(id, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                unit_price = ?3,
                stock_quantity = ?4,
                category_id = ?5,
                updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(product.name.trim())
        .bind(product.unit_price)
        .bind(product.stock_quantity)
        .bind(product.category_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product.
    ///
    /// Committed order lines keep their name and price snapshot.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts total products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Unit-of-work operations (checkout)
    // =========================================================================

    /// Reads a product inside the caller's transaction and takes the write lock.
    ///
    /// ## Why an UPDATE?
    /// SQLite has no `SELECT ... FOR UPDATE`. A no-op write as the first
    /// statement of the transaction acquires the database write lock, so a
    /// concurrent checkout waits (busy timeout) instead of pricing against
    /// stock that is about to change.
    pub async fn resolve_for_update(
        conn: &mut SqliteConnection,
        id: i64,
    ) -> DbResult<Option<ProductSnapshot>> {
        let product = sqlx::query_as::<_, ProductSnapshot>(
            r#"
            UPDATE products SET stock_quantity = stock_quantity
            WHERE id = ?1
            RETURNING id, name, unit_price, stock_quantity
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        debug!(id, found = product.is_some(), "Resolved product for checkout");
        Ok(product)
    }

    /// Decrements stock by `quantity` inside the caller's transaction.
    ///
    /// Under [`StockPolicy::Reject`] the update only applies when enough
    /// stock is on hand, checked in the same statement.
    pub async fn decrement_stock(
        conn: &mut SqliteConnection,
        id: i64,
        quantity: i64,
        policy: StockPolicy,
    ) -> DbResult<StockDecrement> {
        let sql = match policy {
            StockPolicy::Reject => {
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND stock_quantity >= ?2
                RETURNING stock_quantity
                "#
            }
            StockPolicy::AllowBackorder => {
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?2, updated_at = ?3
                WHERE id = ?1
                RETURNING stock_quantity
                "#
            }
        };

        let remaining: Option<i64> = sqlx::query_scalar(sql)
            .bind(id)
            .bind(quantity)
            .bind(Utc::now())
            .fetch_optional(&mut *conn)
            .await?;

        if let Some(remaining) = remaining {
            debug!(id, quantity, remaining, "Stock decremented");
            return Ok(StockDecrement::Applied { remaining });
        }

        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM products WHERE id = ?1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(match available {
            Some(available) => StockDecrement::Insufficient { available },
            None => StockDecrement::NotFound,
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
    use kasir_core::NewCategory;

    fn new_product(name: &str, unit_price: i64, stock_quantity: i64) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            unit_price,
            stock_quantity,
            category_id: None,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let created = repo.insert(&new_product("Kopi Susu", 500, 10)).await.unwrap();
        assert!(created.id > 0);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Kopi Susu");
        assert_eq!(found.unit_price, 500);
        assert_eq!(found.stock_quantity, 10);
        assert_eq!(found.category_name, None);

        assert!(repo.get_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_with_filter_and_category() {
        let db = test_db().await;
        let category = db
            .categories()
            .insert(&NewCategory {
                name: "Minuman".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let repo = db.products();
        let mut kopi = new_product("Kopi Susu", 500, 10);
        kopi.category_id = Some(category.id);
        repo.insert(&kopi).await.unwrap();
        repo.insert(&new_product("Teh Manis", 300, 5)).await.unwrap();

        assert_eq!(repo.list(None).await.unwrap().len(), 2);

        let filtered = repo.list(Some("KOPI")).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category_name.as_deref(), Some("Minuman"));
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let db = test_db().await;
        let mut product = new_product("Kopi Susu", 500, 10);
        product.category_id = Some(42);

        let err = db.products().insert(&product).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let repo = db.products();
        let created = repo.insert(&new_product("Kopi", 500, 10)).await.unwrap();

        let updated = repo
            .update(created.id, &new_product("Kopi Gula Aren", 700, 8))
            .await
            .unwrap();
        assert_eq!(updated.name, "Kopi Gula Aren");
        assert_eq!(updated.unit_price, 700);

        assert!(matches!(
            repo.update(999, &new_product("X", 1, 1)).await,
            Err(DbError::NotFound { .. })
        ));

        repo.delete(created.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(matches!(
            repo.delete(created.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_decrement_stock_guard() {
        let db = test_db().await;
        let created = db
            .products()
            .insert(&new_product("Kopi", 500, 3))
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();

        let outcome =
            ProductRepository::decrement_stock(&mut conn, created.id, 2, StockPolicy::Reject)
                .await
                .unwrap();
        assert_eq!(outcome, StockDecrement::Applied { remaining: 1 });

        let outcome =
            ProductRepository::decrement_stock(&mut conn, created.id, 2, StockPolicy::Reject)
                .await
                .unwrap();
        assert_eq!(outcome, StockDecrement::Insufficient { available: 1 });

        let outcome =
            ProductRepository::decrement_stock(&mut conn, 999, 1, StockPolicy::Reject)
                .await
                .unwrap();
        assert_eq!(outcome, StockDecrement::NotFound);

        let outcome = ProductRepository::decrement_stock(
            &mut conn,
            created.id,
            2,
            StockPolicy::AllowBackorder,
        )
        .await
        .unwrap();
        assert_eq!(outcome, StockDecrement::Applied { remaining: -1 });
    }

    #[tokio::test]
    async fn test_resolve_for_update() {
        let db = test_db().await;
        let created = db
            .products()
            .insert(&new_product("Kopi", 500, 3))
            .await
            .unwrap();

        let mut conn = db.pool().acquire().await.unwrap();
        let snapshot = ProductRepository::resolve_for_update(&mut conn, created.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(snapshot, created.snapshot());

        assert!(ProductRepository::resolve_for_update(&mut conn, 999)
            .await
            .unwrap()
            .is_none());
    }
}
