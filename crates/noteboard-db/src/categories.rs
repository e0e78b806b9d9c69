//! Category repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use noteboard_core::{
    messages, BaseCategorySeed, Category, CategoryRepository, NewCategory, Result, UpdateCategory,
};

use crate::storage_failure;

const CATEGORY_COLUMNS: &str = "id, user_id, name, color, created_at";

/// PostgreSQL implementation of CategoryRepository.
#[derive(Clone)]
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    /// Create a new PgCategoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn map_row(row: sqlx::postgres::PgRow) -> Category {
        Category {
            id: row.get("id"),
            user_id: row.get("user_id"),
            name: row.get("name"),
            color: row.get("color"),
            created_at: row.get("created_at"),
        }
    }

    /// Insert every seed whose name is not already used by a base category.
    ///
    /// Runs in one transaction; returns the number of rows inserted.
    pub async fn seed_base(&self, seeds: &[BaseCategorySeed]) -> Result<u64> {
        let fail = || storage_failure("seed_base", messages::SEED_CATEGORIES_FAILED);

        let mut tx = self.pool.begin().await.map_err(fail())?;
        let mut inserted = 0;

        for seed in seeds {
            let result = sqlx::query(
                "INSERT INTO categories (id, user_id, name, color, created_at)
                 SELECT $1, NULL, $2, $3, $4
                 WHERE NOT EXISTS (
                     SELECT 1 FROM categories WHERE user_id IS NULL AND name = $2
                 )",
            )
            .bind(Uuid::now_v7())
            .bind(seed.name)
            .bind(seed.color)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(fail())?;
            inserted += result.rows_affected();
        }

        tx.commit().await.map_err(fail())?;
        Ok(inserted)
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn create(&self, req: NewCategory) -> Result<Category> {
        let row = sqlx::query(&format!(
            "INSERT INTO categories (id, user_id, name, color, created_at)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&req.user_id)
        .bind(&req.name)
        .bind(&req.color)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_failure(
            "create_category",
            messages::CREATE_CATEGORY_FAILED,
        ))?;

        Ok(Self::map_row(row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_failure("get_category", messages::GET_CATEGORY_FAILED))?;

        Ok(row.map(Self::map_row))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Category>> {
        let rows = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE user_id = $1
             ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_failure(
            "list_categories_by_user",
            messages::GET_CATEGORIES_FAILED,
        ))?;

        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    async fn list_for_user_and_base(&self, user_id: &str) -> Result<Vec<Category>> {
        let fail = || {
            storage_failure(
                "list_categories_for_user_and_base",
                messages::GET_CATEGORIES_FAILED,
            )
        };

        // Base categories always come first, whatever their age.
        let base = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE user_id IS NULL
             ORDER BY name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(fail())?;

        let own = sqlx::query(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories
             WHERE user_id = $1
             ORDER BY created_at ASC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(fail())?;

        Ok(base
            .into_iter()
            .chain(own)
            .map(Self::map_row)
            .collect())
    }

    async fn update(&self, id: Uuid, req: UpdateCategory) -> Result<Option<Category>> {
        let row = sqlx::query(&format!(
            "UPDATE categories
             SET name = COALESCE($2, name),
                 color = COALESCE($3, color)
             WHERE id = $1
             RETURNING {CATEGORY_COLUMNS}"
        ))
        .bind(id)
        .bind(req.name.as_deref())
        .bind(req.color.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_failure(
            "update_category",
            messages::UPDATE_CATEGORY_FAILED,
        ))?;

        Ok(row.map(Self::map_row))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM categories WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_failure(
                    "delete_category",
                    messages::DELETE_CATEGORY_FAILED,
                ))?;

        Ok(deleted)
    }
}

