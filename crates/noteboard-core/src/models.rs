//! Domain models and request types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// CATEGORY TYPES
// =============================================================================

/// A named, colored grouping of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    /// Owning user (None = base category shared by everyone)
    pub user_id: Option<String>,
    pub name: String,
    /// `#RRGGBB`
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Whether this is a shared category with no owner.
    pub fn is_base(&self) -> bool {
        self.user_id.is_none()
    }

    /// Whether `user_id` may see this category.
    pub fn is_visible_to(&self, user_id: &str) -> bool {
        match &self.user_id {
            None => true,
            Some(owner) => owner == user_id,
        }
    }
}

/// Data required to insert a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub user_id: Option<String>,
    pub name: String,
    pub color: String,
}

/// Partial category update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategory {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// A base category inserted by system seeding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseCategorySeed {
    pub name: &'static str,
    pub color: &'static str,
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A titled rich-text note belonging to one user and one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub user_id: String,
    pub category_id: Uuid,
    pub title: String,
    /// Sanitized HTML produced by the editor
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub user_id: String,
    pub category_id: Uuid,
    pub title: String,
    pub content: String,
}

/// Partial note update.
///
/// There is deliberately no timestamp field: `updated_at` is always stamped
/// by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNote {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

impl UpdateNote {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.category_id.is_none()
    }
}
