//! Note actions.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noteboard_core::{
    defaults, messages, normalize_title, validate_content, Error, NewNote, Note, Result,
    UpdateNote,
};

use super::{require_category_id, require_user, ActionResult, Actions};
use crate::revalidate::ViewPath;

/// Input for the full create-note form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

/// Partial note update input. Carries no timestamp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNoteInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

impl Actions {
    pub async fn create_note(&self, user_id: &str, input: CreateNoteInput) -> ActionResult<Note> {
        let outcome = self.try_create_note(user_id, input).await;
        ActionResult::from_outcome("create_note", outcome, "Note created successfully")
    }

    async fn try_create_note(&self, user_id: &str, input: CreateNoteInput) -> Result<Note> {
        let user_id = require_user(user_id)?;
        let title = normalize_title(&input.title)?;
        validate_content(&input.content)?;
        let category_id = input.category_id.ok_or_else(|| {
            Error::InvalidInput(messages::CATEGORY_SELECTION_REQUIRED.to_string())
        })?;
        self.visible_category(category_id, user_id).await?;

        let note = self
            .notes
            .create(NewNote {
                user_id: user_id.to_string(),
                category_id,
                title,
                content: input.content,
            })
            .await?;

        self.revalidate(&[
            ViewPath::Board,
            ViewPath::Category(category_id),
            ViewPath::Note(note.id),
        ])
        .await;
        Ok(note)
    }

    /// Create a note with a default title and empty content so the caller
    /// can navigate straight to it.
    pub async fn create_quick_note(
        &self,
        category_id: Option<Uuid>,
        user_id: &str,
        title: Option<String>,
    ) -> ActionResult<Note> {
        let outcome = self.try_create_quick_note(category_id, user_id, title).await;
        ActionResult::from_outcome("create_quick_note", outcome, "Note created successfully")
    }

    async fn try_create_quick_note(
        &self,
        category_id: Option<Uuid>,
        user_id: &str,
        title: Option<String>,
    ) -> Result<Note> {
        let user_id = require_user(user_id)?;
        let category_id = require_category_id(category_id)?;
        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| defaults::DEFAULT_NOTE_TITLE.to_string());
        self.visible_category(category_id, user_id).await?;

        let note = self
            .notes
            .create(NewNote {
                user_id: user_id.to_string(),
                category_id,
                title,
                content: String::new(),
            })
            .await?;

        self.revalidate(&[
            ViewPath::Board,
            ViewPath::Category(category_id),
            ViewPath::Note(note.id),
        ])
        .await;
        Ok(note)
    }

    /// Fetch a note by ID. Ownership is left to the caller to judge.
    pub async fn get_note_by_id(&self, id: Uuid, user_id: &str) -> ActionResult<Note> {
        let outcome = match require_user(user_id) {
            Ok(_) => self.existing_note(id).await,
            Err(err) => Err(err),
        };
        ActionResult::from_outcome("get_note_by_id", outcome, "Note retrieved successfully")
    }

    pub async fn get_notes_by_user_id(&self, user_id: &str) -> ActionResult<Vec<Note>> {
        let outcome = match require_user(user_id) {
            Ok(user_id) => self.notes.list_by_user(user_id).await,
            Err(err) => Err(err),
        };
        ActionResult::from_outcome("get_notes_by_user_id", outcome, "Notes retrieved successfully")
    }

    pub async fn get_notes_by_category_id(
        &self,
        category_id: Uuid,
        user_id: &str,
    ) -> ActionResult<Vec<Note>> {
        let outcome = match require_user(user_id) {
            Ok(user_id) => self.notes.list_by_category(category_id, user_id).await,
            Err(err) => Err(err),
        };
        ActionResult::from_outcome(
            "get_notes_by_category_id",
            outcome,
            "Notes retrieved successfully",
        )
    }

    pub async fn update_note(
        &self,
        id: Uuid,
        user_id: &str,
        input: UpdateNoteInput,
    ) -> ActionResult<Note> {
        let outcome = self.try_update_note(id, user_id, input).await;
        ActionResult::from_outcome("update_note", outcome, "Note updated successfully")
    }

    /// Reassign a note to another category.
    pub async fn move_note(
        &self,
        id: Uuid,
        user_id: &str,
        category_id: Uuid,
    ) -> ActionResult<Note> {
        let input = UpdateNoteInput {
            category_id: Some(category_id),
            ..Default::default()
        };
        let outcome = self.try_update_note(id, user_id, input).await;
        ActionResult::from_outcome("move_note", outcome, "Note moved successfully")
    }

    async fn try_update_note(
        &self,
        id: Uuid,
        user_id: &str,
        input: UpdateNoteInput,
    ) -> Result<Note> {
        let user_id = require_user(user_id)?;
        let patch = UpdateNote {
            title: input.title.as_deref().map(normalize_title).transpose()?,
            content: input.content,
            category_id: input.category_id,
        };
        if let Some(content) = &patch.content {
            validate_content(content)?;
        }

        let current = self.owned_note(id, user_id).await?;
        if patch.is_empty() {
            return Ok(current);
        }
        let moved_to = patch
            .category_id
            .filter(|category_id| *category_id != current.category_id);
        if let Some(category_id) = moved_to {
            self.visible_category(category_id, user_id).await?;
        }

        let note = self
            .notes
            .update(id, patch)
            .await?
            .ok_or_else(|| Error::NotFound(messages::NOTE_NOT_FOUND.to_string()))?;

        let mut paths = vec![
            ViewPath::Board,
            ViewPath::Note(id),
            ViewPath::Category(current.category_id),
        ];
        if let Some(category_id) = moved_to {
            paths.push(ViewPath::Category(category_id));
        }
        self.revalidate(&paths).await;
        Ok(note)
    }

    /// Delete one of the caller's notes. Returns the removed ID.
    pub async fn delete_note(&self, id: Uuid, user_id: &str) -> ActionResult<Uuid> {
        let outcome = self.try_delete_note(id, user_id).await;
        ActionResult::from_outcome("delete_note", outcome, "Note deleted successfully")
    }

    async fn try_delete_note(&self, id: Uuid, user_id: &str) -> Result<Uuid> {
        let user_id = require_user(user_id)?;
        let current = self.owned_note(id, user_id).await?;

        let deleted = self
            .notes
            .delete(id)
            .await?
            .ok_or_else(|| Error::NotFound(messages::NOTE_NOT_FOUND.to_string()))?;

        self.revalidate(&[
            ViewPath::Board,
            ViewPath::Note(id),
            ViewPath::Category(current.category_id),
        ])
        .await;
        Ok(deleted)
    }

    /// Delete the caller's notes among `ids`. Returns the number removed;
    /// unknown or foreign IDs are skipped.
    pub async fn delete_notes(&self, ids: &[Uuid], user_id: &str) -> ActionResult<u64> {
        let outcome = self.try_delete_notes(ids, user_id).await;
        ActionResult::from_outcome("delete_notes", outcome, "Notes deleted successfully")
    }

    async fn try_delete_notes(&self, ids: &[Uuid], user_id: &str) -> Result<u64> {
        let user_id = require_user(user_id)?;
        if ids.is_empty() {
            return Ok(0);
        }

        let wanted: HashSet<Uuid> = ids.iter().copied().collect();
        let targets: Vec<Note> = self
            .notes
            .list_by_user(user_id)
            .await?
            .into_iter()
            .filter(|note| wanted.contains(&note.id))
            .collect();
        if targets.is_empty() {
            return Ok(0);
        }

        let target_ids: Vec<Uuid> = targets.iter().map(|note| note.id).collect();
        let removed = self.notes.delete_many(&target_ids).await?;

        let categories: HashSet<Uuid> = targets.iter().map(|note| note.category_id).collect();
        let mut paths = vec![ViewPath::Board];
        paths.extend(target_ids.iter().map(|id| ViewPath::Note(*id)));
        paths.extend(categories.into_iter().map(ViewPath::Category));
        self.revalidate(&paths).await;
        Ok(removed)
    }

    async fn existing_note(&self, id: Uuid) -> Result<Note> {
        self.notes
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(messages::NOTE_NOT_FOUND.to_string()))
    }

    /// Fetch a note the caller may modify.
    async fn owned_note(&self, id: Uuid, user_id: &str) -> Result<Note> {
        let note = self.existing_note(id).await?;
        if note.user_id != user_id {
            return Err(Error::Forbidden(messages::NOTE_ACCESS_DENIED.to_string()));
        }
        Ok(note)
    }
}
