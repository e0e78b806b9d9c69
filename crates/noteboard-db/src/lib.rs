//! # noteboard-db
//!
//! PostgreSQL query layer for noteboard.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for categories and notes
//! - Schema migrations and base-category seeding
//! - An in-memory store with the same semantics (feature `memory`)
//!
//! ## Example
//!
//! ```rust,ignore
//! use noteboard_db::{Database, NewCategory, CategoryRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/noteboard").await?;
//!     db.migrate().await?;
//!
//!     let work = db.categories.create(NewCategory {
//!         user_id: Some("u1".to_string()),
//!         name: "Work".to_string(),
//!         color: "#aabbcc".to_string(),
//!     }).await?;
//!
//!     println!("Created category: {}", work.id);
//!     Ok(())
//! }
//! ```
pub mod categories;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod notes;
pub mod pool;

// Test fixtures for integration tests
pub mod test_fixtures;

// Re-export core types
pub use noteboard_core::*;

pub use categories::PgCategoryRepository;
#[cfg(any(test, feature = "memory"))]
pub use memory::MemoryStore;
pub use notes::PgNoteRepository;
pub use pool::{create_pool, create_pool_with_config, PoolConfig};

use sqlx::PgPool;
use tracing::{error, info};

/// Build the error mapper used by every query.
///
/// The storage error is logged with the operation name and then replaced by
/// `message`, so callers only ever see the stable text.
pub(crate) fn storage_failure(
    op: &'static str,
    message: &'static str,
) -> impl FnOnce(sqlx::Error) -> Error {
    move |err| {
        error!(
            subsystem = "database",
            component = "query",
            op,
            error = %err,
            "Storage operation failed"
        );
        Error::Persistence(message.to_string())
    }
}

/// The notes database: one pool shared by both repositories.
#[derive(Clone)]
pub struct Database {
    pub pool: PgPool,
    pub categories: PgCategoryRepository,
    pub notes: PgNoteRepository,
}

impl Database {
    pub fn new(pool: PgPool) -> Self {
        Self {
            categories: PgCategoryRepository::new(pool.clone()),
            notes: PgNoteRepository::new(pool.clone()),
            pool,
        }
    }

    pub async fn connect(url: &str) -> Result<Self> {
        create_pool(url).await.map(Self::new)
    }

    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        create_pool_with_config(url, config).await.map(Self::new)
    }

    /// Apply the workspace `migrations/` directory.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Insert missing base categories. Safe to call on every startup.
    pub async fn seed_base_categories(&self, seeds: &[BaseCategorySeed]) -> Result<u64> {
        let inserted = self.categories.seed_base(seeds).await?;
        info!(
            subsystem = "database",
            component = "seed",
            inserted,
            requested = seeds.len(),
            "Base categories seeded"
        );
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failure_hides_driver_error() {
        let map = storage_failure("create_note", messages::CREATE_NOTE_FAILED);
        let err = map(sqlx::Error::RowNotFound);
        match err {
            Error::Persistence(msg) => assert_eq!(msg, messages::CREATE_NOTE_FAILED),
            other => panic!("Expected Persistence error, got {other:?}"),
        }
    }
}
