//! Core traits for noteboard storage abstractions.
//!
//! These traits define the Query Layer contract. Concrete stores (PostgreSQL,
//! in-memory) implement them so the action layer can be exercised against a
//! substitute store in tests.
//!
//! Every method reports storage failures as [`Error::Persistence`] carrying a
//! stable, operation-specific message. Absence is never an error: lookups
//! return `None`.
//!
//! [`Error::Persistence`]: crate::Error::Persistence

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// CATEGORY REPOSITORY
// =============================================================================

/// Repository for category persistence.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    /// Insert a category and return the stored record.
    async fn create(&self, req: NewCategory) -> Result<Category>;

    /// Get a category by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Category>>;

    /// Categories owned by `user_id`, oldest first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Category>>;

    /// Base categories ordered by name, followed by the user's own
    /// categories ordered by creation time.
    async fn list_for_user_and_base(&self, user_id: &str) -> Result<Vec<Category>>;

    /// Apply a partial update. Returns `None` when no row matched.
    async fn update(&self, id: Uuid, req: UpdateCategory) -> Result<Option<Category>>;

    /// Delete a category (its notes cascade). Returns the removed ID.
    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>>;
}

// =============================================================================
// NOTE REPOSITORY
// =============================================================================

/// Repository for note persistence.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a note and return the stored record.
    async fn create(&self, req: NewNote) -> Result<Note>;

    /// Get a note by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Note>>;

    /// All notes of a user, most recently updated first.
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Note>>;

    /// Notes of a user within one category, most recently updated first.
    async fn list_by_category(&self, category_id: Uuid, user_id: &str) -> Result<Vec<Note>>;

    /// Apply a partial update and stamp a fresh `updated_at`.
    /// Returns `None` when no row matched.
    async fn update(&self, id: Uuid, req: UpdateNote) -> Result<Option<Note>>;

    /// Delete one note. Returns the removed ID.
    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>>;

    /// Delete many notes, returning the number actually removed.
    /// An empty slice returns 0 without touching storage.
    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64>;
}
