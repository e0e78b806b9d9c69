//! Cached view handlers.
//!
//! Each view is computed from actions on first request, stored in the
//! [`ViewCache`](crate::ViewCache) per user and path, and served from there
//! until a mutation revalidates the path. Responses carry `x-view-cache:
//! hit|miss`.

use std::collections::BTreeMap;
use std::future::Future;

use axum::{
    extract::{Path, State},
    http::{HeaderName, HeaderValue},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use noteboard_core::{messages, Category, Note};

use crate::actions::ActionResult;
use crate::revalidate::ViewPath;
use crate::{parse_id, ApiError, AppState, CurrentUser};

pub const VIEW_CACHE_HEADER: &str = "x-view-cache";

type ViewResponse = ([(HeaderName, HeaderValue); 1], Json<ActionResult<Value>>);

#[derive(Debug, Serialize)]
pub struct BoardView {
    pub categories: Vec<Category>,
    pub notes_by_category: BTreeMap<Uuid, Vec<Note>>,
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub category: Category,
    pub notes: Vec<Note>,
}

#[derive(Debug, Serialize)]
pub struct NoteView {
    pub note: Note,
    pub category: Option<Category>,
}

fn cache_header(status: &'static str) -> [(HeaderName, HeaderValue); 1] {
    [(
        HeaderName::from_static(VIEW_CACHE_HEADER),
        HeaderValue::from_static(status),
    )]
}

/// Serialize a typed view into the cached representation.
fn to_view<T: Serialize>(view: T) -> ActionResult<Value> {
    match serde_json::to_value(view) {
        Ok(view) => ActionResult::success("View computed successfully", view),
        Err(e) => {
            tracing::error!(
                subsystem = "api",
                component = "views",
                error = %e,
                "View serialization failed"
            );
            ActionResult::failure(messages::UNEXPECTED_ERROR)
        }
    }
}

async fn serve_cached<F, Fut>(
    state: &AppState,
    user_id: &str,
    path: ViewPath,
    compute: F,
) -> ViewResponse
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ActionResult<Value>>,
{
    if let Some(view) = state.views.get(user_id, &path).await {
        return (
            cache_header("hit"),
            Json(ActionResult::success("View retrieved successfully", view)),
        );
    }

    let epoch = state.views.epoch().await;
    let result = compute().await;
    if result.is_success {
        if let Some(view) = &result.data {
            let stored = state
                .views
                .insert_if_unchanged(user_id, path, epoch, view.clone())
                .await;
            if !stored {
                tracing::debug!(
                    subsystem = "api",
                    component = "views",
                    path = %path,
                    "View went stale while computing, not cached"
                );
            }
        }
    }
    (cache_header("miss"), Json(result))
}

/// Categories plus the caller's notes grouped by category.
pub async fn board_view(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> ViewResponse {
    serve_cached(&state, &user_id, ViewPath::Board, || async {
        let categories = match state.actions.get_categories(&user_id).await.into_result() {
            Ok(categories) => categories,
            Err(message) => return ActionResult::failure(message),
        };
        let notes = match state.actions.get_notes_by_user_id(&user_id).await.into_result() {
            Ok(notes) => notes,
            Err(message) => return ActionResult::failure(message),
        };

        let mut notes_by_category: BTreeMap<Uuid, Vec<Note>> = categories
            .iter()
            .map(|category| (category.id, Vec::new()))
            .collect();
        for note in notes {
            notes_by_category
                .entry(note.category_id)
                .or_default()
                .push(note);
        }

        to_view(BoardView {
            categories,
            notes_by_category,
        })
    })
    .await
}

/// One category with the caller's notes in it.
pub async fn category_view(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<ViewResponse, ApiError> {
    let id = parse_id(&id)?;
    let response = serve_cached(&state, &user_id, ViewPath::Category(id), || async {
        let category = match state
            .actions
            .get_category_by_id(id, &user_id)
            .await
            .into_result()
        {
            Ok(category) => category,
            Err(message) => return ActionResult::failure(message),
        };
        let notes = match state
            .actions
            .get_notes_by_category_id(id, &user_id)
            .await
            .into_result()
        {
            Ok(notes) => notes,
            Err(message) => return ActionResult::failure(message),
        };
        to_view(CategoryView { category, notes })
    })
    .await;
    Ok(response)
}

/// A note with its category. Other users' notes are refused.
pub async fn note_view(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<ViewResponse, ApiError> {
    let id = parse_id(&id)?;
    let response = serve_cached(&state, &user_id, ViewPath::Note(id), || async {
        let note = match state.actions.get_note_by_id(id, &user_id).await.into_result() {
            Ok(note) => note,
            Err(message) => return ActionResult::failure(message),
        };
        if note.user_id != user_id {
            return ActionResult::failure(messages::NOTE_ACCESS_DENIED);
        }
        let category = state
            .actions
            .get_category_by_id(note.category_id, &user_id)
            .await
            .data;
        to_view(NoteView { note, category })
    })
    .await;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use noteboard_db::MemoryStore;

    use super::*;
    use crate::actions::{CreateCategoryInput, CreateNoteInput};
    use crate::ServerConfig;

    fn state(store: &MemoryStore) -> AppState {
        AppState::new(
            Arc::new(store.categories()),
            Arc::new(store.notes()),
            &ServerConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn mutation_during_compute_keeps_view_out_of_cache() {
        let store = MemoryStore::new();
        let state = state(&store);
        let work = state
            .actions
            .create_category(
                "u1",
                CreateCategoryInput {
                    name: "Work".into(),
                    color: None,
                },
            )
            .await
            .data
            .unwrap();

        let (headers, _) = serve_cached(&state, "u1", ViewPath::Board, || async {
            let snapshot = json!({"notes": 0});
            let created = state
                .actions
                .create_note(
                    "u1",
                    CreateNoteInput {
                        title: "Standup".into(),
                        content: String::new(),
                        category_id: Some(work.id),
                    },
                )
                .await;
            assert!(created.is_success);
            ActionResult::success("View computed successfully", snapshot)
        })
        .await;

        assert_eq!(headers[0].1, "miss");
        assert!(state.views.get("u1", &ViewPath::Board).await.is_none());
    }

    #[tokio::test]
    async fn quiet_compute_is_cached() {
        let store = MemoryStore::new();
        let state = state(&store);

        serve_cached(&state, "u1", ViewPath::Board, || async {
            ActionResult::success("View computed successfully", json!({"notes": 0}))
        })
        .await;

        assert_eq!(
            state.views.get("u1", &ViewPath::Board).await,
            Some(json!({"notes": 0}))
        );
    }
}
