use sqlx::PgPool;

use crate::error::{Result, StorageError};
use crate::models::{Category, CategoryName};

pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Whether a category with exactly this name exists
    pub async fn exists(&self, name: &CategoryName) -> Result<bool> {
        let mut conn = self.pool.acquire().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM categories WHERE name = $1)")
                .bind(name.as_ref())
                .fetch_one(&mut *conn)
                .await?;

        Ok(exists)
    }

    /// Insert a new active category
    pub async fn insert(&self, name: &CategoryName) -> Result<Category> {
        let mut conn = self.pool.acquire().await?;

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, status)
            VALUES ($1, TRUE)
            RETURNING id, name, status
            "#,
        )
        .bind(name.as_ref())
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            let err = StorageError::from(e);
            if err.is_unique_violation() {
                StorageError::DuplicateName(name.to_string())
            } else {
                err
            }
        })?;

        Ok(category)
    }
}
