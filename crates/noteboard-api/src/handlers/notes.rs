//! Note HTTP handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use noteboard_core::Note;

use crate::actions::{ActionResult, CreateNoteInput, UpdateNoteInput};
use crate::{parse_id, ApiError, AppState, CurrentUser};

/// Request body for quick create. Both fields may be omitted; the action
/// reports a missing category.
#[derive(Debug, Default, Deserialize)]
pub struct QuickNoteRequest {
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MoveNoteRequest {
    pub category_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct BulkDeleteRequest {
    #[serde(default)]
    pub ids: Vec<Uuid>,
}

/// All of the caller's notes, most recently updated first.
pub async fn list_notes(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Json<ActionResult<Vec<Note>>> {
    Json(state.actions.get_notes_by_user_id(&user_id).await)
}

pub async fn list_notes_by_category(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(category_id): Path<String>,
) -> Result<Json<ActionResult<Vec<Note>>>, ApiError> {
    let category_id = parse_id(&category_id)?;
    Ok(Json(
        state
            .actions
            .get_notes_by_category_id(category_id, &user_id)
            .await,
    ))
}

pub async fn create_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<CreateNoteInput>,
) -> Json<ActionResult<Note>> {
    Json(state.actions.create_note(&user_id, input).await)
}

pub async fn create_quick_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<QuickNoteRequest>,
) -> Json<ActionResult<Note>> {
    Json(
        state
            .actions
            .create_quick_note(req.category_id, &user_id, req.title)
            .await,
    )
}

pub async fn get_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<Note>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.actions.get_note_by_id(id, &user_id).await))
}

pub async fn update_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateNoteInput>,
) -> Result<Json<ActionResult<Note>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.actions.update_note(id, &user_id, input).await))
}

pub async fn move_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<MoveNoteRequest>,
) -> Result<Json<ActionResult<Note>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(
        state
            .actions
            .move_note(id, &user_id, req.category_id)
            .await,
    ))
}

pub async fn delete_note(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<Uuid>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.actions.delete_note(id, &user_id).await))
}

/// Bulk delete; returns the number of notes actually removed.
pub async fn delete_notes(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(req): Json<BulkDeleteRequest>,
) -> Json<ActionResult<u64>> {
    Json(state.actions.delete_notes(&req.ids, &user_id).await)
}
