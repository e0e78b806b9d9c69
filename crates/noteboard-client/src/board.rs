//! Board controller.
//!
//! Holds the categories shown on the board and, per category, the current
//! user's notes. A refresh fetches every category concurrently and swaps the
//! whole mapping in once all fetches have settled.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};
use uuid::Uuid;

use noteboard_api::actions::CreateNoteInput;
use noteboard_core::{Category, Note};

use crate::client::{action_data, ActionClient, ClientError, ClientResult};
use crate::identity::IdentityProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardStatus {
    /// Nothing fetched yet.
    Idle,
    /// No signed-in user; fetching waits for one.
    AwaitingIdentity,
    Loading,
    Ready,
}

/// Where the UI should go after a board operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Board,
    Note(Uuid),
}

/// A category whose notes could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryError {
    pub category_id: Uuid,
    pub category_name: String,
    pub message: String,
}

pub struct BoardController {
    client: Arc<dyn ActionClient>,
    identity: Arc<dyn IdentityProvider>,
    categories: Vec<Category>,
    notes_by_category: HashMap<Uuid, Vec<Note>>,
    status: BoardStatus,
    errors: Vec<CategoryError>,
    fetched_for: Option<String>,
}

impl BoardController {
    pub fn new(client: Arc<dyn ActionClient>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            client,
            identity,
            categories: Vec::new(),
            notes_by_category: HashMap::new(),
            status: BoardStatus::Idle,
            errors: Vec::new(),
            fetched_for: None,
        }
    }

    pub fn status(&self) -> BoardStatus {
        self.status
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn notes_for(&self, category_id: Uuid) -> &[Note] {
        self.notes_by_category
            .get(&category_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn notes_by_category(&self) -> &HashMap<Uuid, Vec<Note>> {
        &self.notes_by_category
    }

    /// Every category that failed during the last refresh.
    pub fn errors(&self) -> &[CategoryError] {
        &self.errors
    }

    /// One line naming each failing category, for display.
    pub fn error_summary(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.category_name, e.message))
            .collect();
        Some(parts.join("; "))
    }

    /// Replace the categories; refreshes only when they differ.
    pub async fn set_categories(&mut self, categories: Vec<Category>) {
        if categories == self.categories {
            return;
        }
        self.categories = categories;
        self.refresh().await;
    }

    /// Fetch the visible categories through the client, then refresh.
    pub async fn load_categories(&mut self) -> ClientResult<()> {
        let user_id = self.identity.current_user().ok_or_else(|| {
            self.status = BoardStatus::AwaitingIdentity;
            ClientError::MissingIdentity
        })?;
        let categories = action_data(self.client.get_categories(&user_id).await?)?;
        self.set_categories(categories).await;
        Ok(())
    }

    /// Refresh if the signed-in user is not the one the board was built for.
    pub async fn identity_changed(&mut self) {
        if self.identity.current_user() != self.fetched_for {
            self.refresh().await;
        }
    }

    pub async fn refresh(&mut self) {
        let Some(user_id) = self.identity.current_user() else {
            debug!(subsystem = "client", component = "board", "No user; refresh deferred");
            self.status = BoardStatus::AwaitingIdentity;
            self.notes_by_category.clear();
            self.fetched_for = None;
            return;
        };

        self.status = BoardStatus::Loading;
        let client = &self.client;
        let user = user_id.as_str();
        let fetches = self.categories.iter().map(|category| async move {
            let outcome = client.get_notes_by_category_id(category.id, user).await;
            (category, outcome)
        });
        let results = join_all(fetches).await;

        let mut notes_by_category = HashMap::with_capacity(results.len());
        let mut errors = Vec::new();
        for (category, outcome) in results {
            match outcome.and_then(action_data) {
                Ok(notes) => {
                    notes_by_category.insert(category.id, notes);
                }
                Err(err) => {
                    warn!(
                        subsystem = "client",
                        component = "board",
                        category_id = %category.id,
                        error = %err,
                        "Category fetch failed"
                    );
                    errors.push(CategoryError {
                        category_id: category.id,
                        category_name: category.name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }

        self.notes_by_category = notes_by_category;
        self.errors = errors;
        self.fetched_for = Some(user_id);
        self.status = BoardStatus::Ready;
    }

    /// Create a note from the full form and open it.
    pub async fn create_note(&mut self, input: CreateNoteInput) -> ClientResult<Navigation> {
        let user_id = self
            .identity
            .current_user()
            .ok_or(ClientError::MissingIdentity)?;
        let note = action_data(self.client.create_note(&user_id, input).await?)?;
        Ok(self.merge_created(note))
    }

    /// Create an untitled note in `category_id` and open it.
    pub async fn quick_create(&mut self, category_id: Uuid) -> ClientResult<Navigation> {
        let user_id = self
            .identity
            .current_user()
            .ok_or(ClientError::MissingIdentity)?;
        let note = action_data(
            self.client
                .create_quick_note(Some(category_id), &user_id, None)
                .await?,
        )?;
        Ok(self.merge_created(note))
    }

    fn merge_created(&mut self, note: Note) -> Navigation {
        let id = note.id;
        self.notes_by_category
            .entry(note.category_id)
            .or_default()
            .insert(0, note);
        Navigation::Note(id)
    }

    /// Notes whose title contains `query`, ignoring case. Newest first.
    pub fn search(&self, query: &str) -> Vec<&Note> {
        let needle = query.trim().to_lowercase();
        let mut found: Vec<&Note> = self
            .notes_by_category
            .values()
            .flatten()
            .filter(|note| needle.is_empty() || note.title.to_lowercase().contains(&needle))
            .collect();
        found.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        found
    }
}
