//! # Category Repository
//!
//! CRUD for product categories. Deleting a category leaves its products
//! in place with `category_id = NULL` (`ON DELETE SET NULL`).

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use kasir_core::{Category, NewCategory};

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Lists all categories ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT id, name, description, created_at, updated_at FROM categories WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn insert(&self, category: &NewCategory) -> DbResult<Category> {
        debug!(name = %category.name, "Inserting category");

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?3)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(category.name.trim())
        .bind(category.description.as_deref())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    /// Replaces name and description.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Category doesn't exist
    pub async fn update(&self, id: i64, category: &NewCategory) -> DbResult<Category> {
        debug!(id, "Updating category");

        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET name = ?2, description = ?3, updated_at = ?4
            WHERE id = ?1
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(category.name.trim())
        .bind(category.description.as_deref())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Category", id))
    }

    pub async fn delete(&self, id: i64) -> DbResult<()> {
        debug!(id, "Deleting category");

        let result = sqlx::query("DELETE FROM categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Category", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use kasir_core::NewProduct;

    fn minuman() -> NewCategory {
        NewCategory {
            name: "Minuman".to_string(),
            description: Some("Kopi, teh, jus".to_string()),
        }
    }

    #[tokio::test]
    async fn test_category_crud() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.categories();

        let created = repo.insert(&minuman()).await.unwrap();
        assert_eq!(created.name, "Minuman");
        assert_eq!(repo.list().await.unwrap().len(), 1);

        let updated = repo
            .update(
                created.id,
                &NewCategory {
                    name: "Minuman Dingin".to_string(),
                    description: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Minuman Dingin");
        assert_eq!(updated.description, None);

        repo.delete(created.id).await.unwrap();
        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(matches!(
            repo.update(created.id, &minuman()).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_detaches_products() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let category = db.categories().insert(&minuman()).await.unwrap();
        let product = db
            .products()
            .insert(&NewProduct {
                name: "Es Teh".to_string(),
                unit_price: 300,
                stock_quantity: 5,
                category_id: Some(category.id),
            })
            .await
            .unwrap();

        db.categories().delete(category.id).await.unwrap();

        let product = db.products().get_by_id(product.id).await.unwrap().unwrap();
        assert_eq!(product.category_id, None);
        assert_eq!(product.category_name, None);
    }
}
