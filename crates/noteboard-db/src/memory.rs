//! In-memory store implementing the repository traits.
//!
//! Mirrors the PostgreSQL semantics that callers depend on: ordering,
//! cascade on category delete, the foreign-key check on note insert, and a
//! non-decreasing `updated_at`. A failure switch makes every operation fail
//! with its stable persistence message, and a counter records how many
//! operations reached the store.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use noteboard_core::{
    messages, BaseCategorySeed, Category, CategoryRepository, Error, NewCategory, NewNote, Note,
    NoteRepository, Result, UpdateCategory, UpdateNote,
};

#[derive(Default)]
struct MemoryState {
    categories: Vec<Category>,
    notes: Vec<Note>,
}

#[derive(Default)]
struct Shared {
    state: RwLock<MemoryState>,
    failing: AtomicBool,
    calls: AtomicUsize,
}

impl Shared {
    /// Count the call and fail it when the switch is on.
    fn enter(&self, message: &'static str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Persistence(message.to_string()));
        }
        Ok(())
    }
}

/// Shared in-memory state handing out category and note repositories.
#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Category repository over this store.
    pub fn categories(&self) -> MemoryCategoryRepository {
        MemoryCategoryRepository {
            shared: self.shared.clone(),
        }
    }

    /// Note repository over this store.
    pub fn notes(&self) -> MemoryNoteRepository {
        MemoryNoteRepository {
            shared: self.shared.clone(),
        }
    }

    /// Make every subsequent operation fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of repository operations that reached the store.
    pub fn calls(&self) -> usize {
        self.shared.calls.load(Ordering::SeqCst)
    }

    /// Insert missing base categories, like `Database::seed_base_categories`.
    pub async fn seed_base(&self, seeds: &[BaseCategorySeed]) -> Result<u64> {
        self.shared.enter(messages::SEED_CATEGORIES_FAILED)?;
        let mut state = self.shared.state.write().await;
        let mut inserted = 0;
        for seed in seeds {
            let exists = state
                .categories
                .iter()
                .any(|c| c.user_id.is_none() && c.name == seed.name);
            if !exists {
                state.categories.push(Category {
                    id: Uuid::now_v7(),
                    user_id: None,
                    name: seed.name.to_string(),
                    color: seed.color.to_string(),
                    created_at: Utc::now(),
                });
                inserted += 1;
            }
        }
        Ok(inserted)
    }
}

/// Category half of [`MemoryStore`].
#[derive(Clone)]
pub struct MemoryCategoryRepository {
    shared: Arc<Shared>,
}

#[async_trait]
impl CategoryRepository for MemoryCategoryRepository {
    async fn create(&self, req: NewCategory) -> Result<Category> {
        self.shared.enter(messages::CREATE_CATEGORY_FAILED)?;
        let category = Category {
            id: Uuid::now_v7(),
            user_id: req.user_id,
            name: req.name,
            color: req.color,
            created_at: Utc::now(),
        };
        self.shared
            .state
            .write()
            .await
            .categories
            .push(category.clone());
        Ok(category)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        self.shared.enter(messages::GET_CATEGORY_FAILED)?;
        let state = self.shared.state.read().await;
        Ok(state.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Category>> {
        self.shared.enter(messages::GET_CATEGORIES_FAILED)?;
        let state = self.shared.state.read().await;
        let mut own: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| c.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        own.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(own)
    }

    async fn list_for_user_and_base(&self, user_id: &str) -> Result<Vec<Category>> {
        self.shared.enter(messages::GET_CATEGORIES_FAILED)?;
        let state = self.shared.state.read().await;

        let mut base: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| c.user_id.is_none())
            .cloned()
            .collect();
        base.sort_by(|a, b| a.name.cmp(&b.name));

        let mut own: Vec<Category> = state
            .categories
            .iter()
            .filter(|c| c.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect();
        own.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        base.extend(own);
        Ok(base)
    }

    async fn update(&self, id: Uuid, req: UpdateCategory) -> Result<Option<Category>> {
        self.shared.enter(messages::UPDATE_CATEGORY_FAILED)?;
        let mut state = self.shared.state.write().await;
        let Some(category) = state.categories.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = req.name {
            category.name = name;
        }
        if let Some(color) = req.color {
            category.color = color;
        }
        Ok(Some(category.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>> {
        self.shared.enter(messages::DELETE_CATEGORY_FAILED)?;
        let mut state = self.shared.state.write().await;
        let before = state.categories.len();
        state.categories.retain(|c| c.id != id);
        if state.categories.len() == before {
            return Ok(None);
        }
        // ON DELETE CASCADE
        state.notes.retain(|n| n.category_id != id);
        Ok(Some(id))
    }
}

/// Note half of [`MemoryStore`].
#[derive(Clone)]
pub struct MemoryNoteRepository {
    shared: Arc<Shared>,
}

fn newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[async_trait]
impl NoteRepository for MemoryNoteRepository {
    async fn create(&self, req: NewNote) -> Result<Note> {
        self.shared.enter(messages::CREATE_NOTE_FAILED)?;
        let mut state = self.shared.state.write().await;
        // Foreign key on notes.category_id
        if !state.categories.iter().any(|c| c.id == req.category_id) {
            return Err(Error::Persistence(messages::CREATE_NOTE_FAILED.to_string()));
        }
        let now = Utc::now();
        let note = Note {
            id: Uuid::now_v7(),
            user_id: req.user_id,
            category_id: req.category_id,
            title: req.title,
            content: req.content,
            created_at: now,
            updated_at: now,
        };
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Note>> {
        self.shared.enter(messages::GET_NOTE_FAILED)?;
        let state = self.shared.state.read().await;
        Ok(state.notes.iter().find(|n| n.id == id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Note>> {
        self.shared.enter(messages::GET_NOTES_FAILED)?;
        let state = self.shared.state.read().await;
        let mut notes: Vec<Note> = state
            .notes
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut notes);
        Ok(notes)
    }

    async fn list_by_category(&self, category_id: Uuid, user_id: &str) -> Result<Vec<Note>> {
        self.shared.enter(messages::GET_NOTES_FAILED)?;
        let state = self.shared.state.read().await;
        let mut notes: Vec<Note> = state
            .notes
            .iter()
            .filter(|n| n.category_id == category_id && n.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut notes);
        Ok(notes)
    }

    async fn update(&self, id: Uuid, req: UpdateNote) -> Result<Option<Note>> {
        self.shared.enter(messages::UPDATE_NOTE_FAILED)?;
        let mut state = self.shared.state.write().await;
        if let Some(category_id) = req.category_id {
            if !state.categories.iter().any(|c| c.id == category_id) {
                return Err(Error::Persistence(messages::UPDATE_NOTE_FAILED.to_string()));
            }
        }
        let Some(note) = state.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        if let Some(title) = req.title {
            note.title = title;
        }
        if let Some(content) = req.content {
            note.content = content;
        }
        if let Some(category_id) = req.category_id {
            note.category_id = category_id;
        }
        note.updated_at = Utc::now().max(note.updated_at);
        Ok(Some(note.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Uuid>> {
        self.shared.enter(messages::DELETE_NOTE_FAILED)?;
        let mut state = self.shared.state.write().await;
        let before = state.notes.len();
        state.notes.retain(|n| n.id != id);
        Ok((state.notes.len() < before).then_some(id))
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.shared.enter(messages::DELETE_NOTES_FAILED)?;
        let mut state = self.shared.state.write().await;
        let before = state.notes.len();
        state.notes.retain(|n| !ids.contains(&n.id));
        Ok((before - state.notes.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_category(user_id: Option<&str>, name: &str) -> NewCategory {
        NewCategory {
            user_id: user_id.map(String::from),
            name: name.to_string(),
            color: "#aabbcc".to_string(),
        }
    }

    fn new_note(category_id: Uuid, title: &str) -> NewNote {
        NewNote {
            user_id: "u1".to_string(),
            category_id,
            title: title.to_string(),
            content: String::new(),
        }
    }

    #[tokio::test]
    async fn create_then_get_returns_input_plus_generated_fields() {
        let store = MemoryStore::new();
        let created = store
            .categories()
            .create(new_category(Some("u1"), "Work"))
            .await
            .unwrap();

        let fetched = store.categories().get(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.name, "Work");
        assert_eq!(fetched.user_id.as_deref(), Some("u1"));
    }

    #[tokio::test]
    async fn base_categories_come_before_user_categories() {
        let store = MemoryStore::new();
        let categories = store.categories();
        // User category created first, base categories afterwards.
        categories
            .create(new_category(Some("u1"), "Alpha"))
            .await
            .unwrap();
        categories.create(new_category(None, "Zeta")).await.unwrap();
        categories.create(new_category(None, "Beta")).await.unwrap();
        categories
            .create(new_category(Some("u2"), "Other"))
            .await
            .unwrap();

        let listed = categories.list_for_user_and_base("u1").await.unwrap();
        let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Zeta", "Alpha"]);
    }

    #[tokio::test]
    async fn deleting_category_cascades_to_notes() {
        let store = MemoryStore::new();
        let work = store
            .categories()
            .create(new_category(Some("u1"), "Work"))
            .await
            .unwrap();
        store.notes().create(new_note(work.id, "a")).await.unwrap();
        store.notes().create(new_note(work.id, "b")).await.unwrap();

        assert_eq!(store.categories().delete(work.id).await.unwrap(), Some(work.id));
        let left = store.notes().list_by_category(work.id, "u1").await.unwrap();
        assert!(left.is_empty());
    }

    #[tokio::test]
    async fn note_insert_requires_existing_category() {
        let store = MemoryStore::new();
        let err = store
            .notes()
            .create(new_note(Uuid::now_v7(), "orphan"))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), messages::CREATE_NOTE_FAILED);
    }

    #[tokio::test]
    async fn update_never_moves_updated_at_backwards() {
        let store = MemoryStore::new();
        let work = store
            .categories()
            .create(new_category(Some("u1"), "Work"))
            .await
            .unwrap();
        let note = store.notes().create(new_note(work.id, "a")).await.unwrap();

        let updated = store
            .notes()
            .update(
                note.id,
                UpdateNote {
                    content: Some("<p>hi</p>".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert!(updated.updated_at >= note.updated_at);
        assert_eq!(updated.title, "a");
        assert_eq!(updated.content, "<p>hi</p>");
    }

    #[tokio::test]
    async fn delete_many_with_no_ids_does_not_touch_store() {
        let store = MemoryStore::new();
        let removed = store.notes().delete_many(&[]).await.unwrap();
        assert_eq!(removed, 0);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn delete_many_counts_only_existing_rows() {
        let store = MemoryStore::new();
        let work = store
            .categories()
            .create(new_category(Some("u1"), "Work"))
            .await
            .unwrap();
        let a = store.notes().create(new_note(work.id, "a")).await.unwrap();

        let removed = store
            .notes()
            .delete_many(&[a.id, Uuid::now_v7()])
            .await
            .unwrap();
        assert_eq!(removed, 1);
    }

    #[tokio::test]
    async fn failing_store_reports_stable_message() {
        let store = MemoryStore::new();
        store.set_failing(true);
        let err = store
            .categories()
            .create(new_category(Some("u1"), "Work"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Persistence(_)));
        assert_eq!(err.to_string(), messages::CREATE_CATEGORY_FAILED);
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let store = MemoryStore::new();
        let seeds = noteboard_core::defaults::BASE_CATEGORIES;
        assert_eq!(store.seed_base(seeds).await.unwrap(), seeds.len() as u64);
        assert_eq!(store.seed_base(seeds).await.unwrap(), 0);
    }
}
