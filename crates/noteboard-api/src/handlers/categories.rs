//! Category HTTP handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use noteboard_core::Category;

use crate::actions::{ActionResult, CreateCategoryInput, UpdateCategoryInput};
use crate::{parse_id, ApiError, AppState, CurrentUser};

/// List base categories followed by the caller's own.
pub async fn list_categories(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
) -> Json<ActionResult<Vec<Category>>> {
    Json(state.actions.get_categories(&user_id).await)
}

pub async fn create_category(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Json(input): Json<CreateCategoryInput>,
) -> Json<ActionResult<Category>> {
    Json(state.actions.create_category(&user_id, input).await)
}

pub async fn get_category(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<Category>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.actions.get_category_by_id(id, &user_id).await))
}

pub async fn update_category(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
    Json(input): Json<UpdateCategoryInput>,
) -> Result<Json<ActionResult<Category>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.actions.update_category(id, &user_id, input).await))
}

/// Delete a category and, through the cascade, its notes.
pub async fn delete_category(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<ActionResult<Uuid>>, ApiError> {
    let id = parse_id(&id)?;
    Ok(Json(state.actions.delete_category(id, &user_id).await))
}
