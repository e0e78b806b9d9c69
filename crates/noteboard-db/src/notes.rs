//! Note repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use noteboard_core::{messages, NewNote, Note, NoteRepository, Result, UpdateNote};

use crate::storage_failure;

const NOTE_COLUMNS: &str = "id, user_id, category_id, title, content, created_at, updated_at";

/// PostgreSQL implementation of NoteRepository.
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: Pool<Postgres>,
}

impl PgNoteRepository {
    /// Create a new PgNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn map_row(row: sqlx::postgres::PgRow) -> Note {
        Note {
            id: row.get("id"),
            user_id: row.get("user_id"),
            category_id: row.get("category_id"),
            title: row.get("title"),
            content: row.get("content"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn create(&self, req: NewNote) -> Result<Note> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            "INSERT INTO notes (id, user_id, category_id, title, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(Uuid::now_v7())
        .bind(&req.user_id)
        .bind(req.category_id)
        .bind(&req.title)
        .bind(&req.content)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(storage_failure("create_note", messages::CREATE_NOTE_FAILED))?;

        Ok(Self::map_row(row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>> {
        let row = sqlx::query(&format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_failure("get_note", messages::GET_NOTE_FAILED))?;

        Ok(row.map(Self::map_row))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE user_id = $1
             ORDER BY updated_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_failure("list_notes_by_user", messages::GET_NOTES_FAILED))?;

        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    async fn list_by_category(&self, category_id: Uuid, user_id: &str) -> Result<Vec<Note>> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE category_id = $1 AND user_id = $2
             ORDER BY updated_at DESC"
        ))
        .bind(category_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_failure("list_notes_by_category", messages::GET_NOTES_FAILED))?;

        Ok(rows.into_iter().map(Self::map_row).collect())
    }

    async fn update(&self, id: Uuid, req: UpdateNote) -> Result<Option<Note>> {
        // GREATEST keeps updated_at non-decreasing even if the clock steps back.
        let row = sqlx::query(&format!(
            "UPDATE notes
             SET title = COALESCE($2, title),
                 content = COALESCE($3, content),
                 category_id = COALESCE($4, category_id),
                 updated_at = GREATEST($5, updated_at)
             WHERE id = $1
             RETURNING {NOTE_COLUMNS}"
        ))
        .bind(id)
        .bind(req.title.as_deref())
        .bind(req.content.as_deref())
        .bind(req.category_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_failure("update_note", messages::UPDATE_NOTE_FAILED))?;

        Ok(row.map(Self::map_row))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>> {
        let deleted: Option<Uuid> =
            sqlx::query_scalar("DELETE FROM notes WHERE id = $1 RETURNING id")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(storage_failure("delete_note", messages::DELETE_NOTE_FAILED))?;

        Ok(deleted)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            debug!(
                subsystem = "database",
                component = "notes",
                op = "delete_many",
                "Empty id list, nothing to delete"
            );
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM notes WHERE id = ANY($1)")
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(storage_failure("delete_notes", messages::DELETE_NOTES_FAILED))?;

        Ok(result.rows_affected())
    }
}
