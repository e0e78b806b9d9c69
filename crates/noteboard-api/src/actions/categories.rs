//! Category actions.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noteboard_core::{
    defaults, messages, normalize_name, validate_color, Category, Error, NewCategory, Result,
    UpdateCategory,
};

use super::{require_user, ActionResult, Actions};
use crate::revalidate::ViewPath;

/// Input for creating a category. Color defaults to a neutral gray.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Partial category update input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategoryInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl Actions {
    pub async fn create_category(
        &self,
        user_id: &str,
        input: CreateCategoryInput,
    ) -> ActionResult<Category> {
        let outcome = self.try_create_category(user_id, input).await;
        ActionResult::from_outcome("create_category", outcome, "Category created successfully")
    }

    async fn try_create_category(
        &self,
        user_id: &str,
        input: CreateCategoryInput,
    ) -> Result<Category> {
        let user_id = require_user(user_id)?;
        let name = normalize_name(&input.name)?;
        let color = match input.color {
            Some(color) => {
                validate_color(&color)?;
                color
            }
            None => defaults::DEFAULT_CATEGORY_COLOR.to_string(),
        };
        self.ensure_unique_name(user_id, &name, None).await?;

        let category = self
            .categories
            .create(NewCategory {
                user_id: Some(user_id.to_string()),
                name,
                color,
            })
            .await?;

        self.revalidate(&[ViewPath::Board]).await;
        Ok(category)
    }

    /// Base categories followed by the caller's own.
    pub async fn get_categories(&self, user_id: &str) -> ActionResult<Vec<Category>> {
        let outcome = match require_user(user_id) {
            Ok(user_id) => self.categories.list_for_user_and_base(user_id).await,
            Err(err) => Err(err),
        };
        ActionResult::from_outcome("get_categories", outcome, "Categories retrieved successfully")
    }

    pub async fn get_category_by_id(&self, id: Uuid, user_id: &str) -> ActionResult<Category> {
        let outcome = match require_user(user_id) {
            Ok(user_id) => self.visible_category(id, user_id).await,
            Err(err) => Err(err),
        };
        ActionResult::from_outcome("get_category_by_id", outcome, "Category retrieved successfully")
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        user_id: &str,
        input: UpdateCategoryInput,
    ) -> ActionResult<Category> {
        let outcome = self.try_update_category(id, user_id, input).await;
        ActionResult::from_outcome("update_category", outcome, "Category updated successfully")
    }

    async fn try_update_category(
        &self,
        id: Uuid,
        user_id: &str,
        input: UpdateCategoryInput,
    ) -> Result<Category> {
        let user_id = require_user(user_id)?;
        if let Some(color) = &input.color {
            validate_color(color)?;
        }
        let patch = UpdateCategory {
            name: input.name.as_deref().map(normalize_name).transpose()?,
            color: input.color,
        };
        self.owned_category(id, user_id).await?;
        if let Some(name) = &patch.name {
            self.ensure_unique_name(user_id, name, Some(id)).await?;
        }

        let category = self
            .categories
            .update(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(messages::CATEGORY_NOT_FOUND.to_string()))?;

        // Note views embed their category's name and color.
        let notes = self.notes.list_by_category(id, user_id).await?;
        let mut paths = vec![ViewPath::Board, ViewPath::Category(id)];
        paths.extend(notes.iter().map(|note| ViewPath::Note(note.id)));
        self.revalidate(&paths).await;
        Ok(category)
    }

    /// Delete a category together with its notes. Returns the removed ID.
    pub async fn delete_category(&self, id: Uuid, user_id: &str) -> ActionResult<Uuid> {
        let outcome = self.try_delete_category(id, user_id).await;
        ActionResult::from_outcome("delete_category", outcome, "Category deleted successfully")
    }

    async fn try_delete_category(&self, id: Uuid, user_id: &str) -> Result<Uuid> {
        let user_id = require_user(user_id)?;
        self.owned_category(id, user_id).await?;

        // Collected before the cascade removes them.
        let doomed = self.notes.list_by_category(id, user_id).await?;

        let deleted = self
            .categories
            .delete(id)
            .await?
            .ok_or_else(|| Error::NotFound(messages::CATEGORY_NOT_FOUND.to_string()))?;

        let mut paths = vec![ViewPath::Board, ViewPath::Category(id)];
        paths.extend(doomed.iter().map(|note| ViewPath::Note(note.id)));
        self.revalidate(&paths).await;
        Ok(deleted)
    }

    /// Fetch a category the caller may see.
    pub(super) async fn visible_category(&self, id: Uuid, user_id: &str) -> Result<Category> {
        let category = self
            .categories
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(messages::CATEGORY_NOT_FOUND.to_string()))?;
        if !category.is_visible_to(user_id) {
            return Err(Error::Forbidden(messages::CATEGORY_ACCESS_DENIED.to_string()));
        }
        Ok(category)
    }

    /// Fetch a category the caller may modify.
    async fn owned_category(&self, id: Uuid, user_id: &str) -> Result<Category> {
        let category = self.visible_category(id, user_id).await?;
        if category.is_base() {
            return Err(Error::Forbidden(messages::BASE_CATEGORY_READ_ONLY.to_string()));
        }
        Ok(category)
    }

    /// Names are unique per user, compared trimmed and case-insensitively.
    async fn ensure_unique_name(
        &self,
        user_id: &str,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<()> {
        let wanted = name.to_lowercase();
        let existing = self.categories.list_by_user(user_id).await?;
        let taken = existing
            .iter()
            .filter(|c| Some(c.id) != except)
            .any(|c| c.name.trim().to_lowercase() == wanted);
        if taken {
            return Err(Error::InvalidInput(messages::DUPLICATE_CATEGORY_NAME.to_string()));
        }
        Ok(())
    }
}
