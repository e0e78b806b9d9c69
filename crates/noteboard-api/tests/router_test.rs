//! Router tests over the in-memory store.
//!
//! Covers the transport contract (identity header, malformed ids, request
//! ids), the action envelope on every route, and the lazy view cache.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{body_json, build_test_app, get, post_json, send, USER};
use noteboard_core::{defaults, messages};

async fn create_category(app: &axum::Router, name: &str) -> String {
    let response = post_json(
        app,
        "/api/categories",
        json!({"name": name, "color": "#aabbcc"}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["isSuccess"], true, "{json}");
    json["data"]["id"].as_str().unwrap().to_string()
}

async fn create_note(app: &axum::Router, category_id: &str, title: &str) -> Value {
    let response = post_json(
        app,
        "/api/notes",
        json!({"title": title, "content": "", "category_id": category_id}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["isSuccess"], true, "{json}");
    json["data"].clone()
}

#[tokio::test]
async fn health_check_returns_ok() {
    let app = build_test_app();
    let response = send(&app.router, Method::GET, "/health", None, None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = build_test_app();
    let response = send(&app.router, Method::GET, "/health", None, None).await;

    let request_id = response.headers().get("x-request-id").unwrap();
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = build_test_app();
    let response = send(&app.router, Method::GET, "/api/notes", None, None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], messages::USER_ID_REQUIRED);
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn malformed_id_is_bad_request() {
    let app = build_test_app();
    let response = get(&app.router, "/api/notes/not-a-uuid").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not-a-uuid"));
}

#[tokio::test]
async fn work_standup_scenario() {
    let app = build_test_app();
    let work = create_category(&app.router, "Work").await;
    create_note(&app.router, &work, "Standup").await;

    let response = get(&app.router, &format!("/api/categories/{work}/notes")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let notes = json["data"].as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["title"], "Standup");
    assert_eq!(notes[0]["user_id"], USER);
}

#[tokio::test]
async fn action_failures_answer_200_with_envelope() {
    let app = build_test_app();
    let missing = uuid::Uuid::now_v7();

    let response = get(&app.router, &format!("/api/notes/{missing}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json,
        json!({"isSuccess": false, "message": messages::NOTE_NOT_FOUND})
    );
}

#[tokio::test]
async fn quick_create_reports_missing_category() {
    let app = build_test_app();
    let response = post_json(&app.router, "/api/notes/quick", json!({})).await;

    let json = body_json(response).await;
    assert_eq!(json["isSuccess"], false);
    assert_eq!(json["message"], messages::CATEGORY_ID_REQUIRED);
}

#[tokio::test]
async fn quick_create_uses_default_title() {
    let app = build_test_app();
    let work = create_category(&app.router, "Work").await;

    let response = post_json(&app.router, "/api/notes/quick", json!({"category_id": work})).await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["title"], defaults::DEFAULT_NOTE_TITLE);
    assert_eq!(json["data"]["content"], "");
}

#[tokio::test]
async fn patch_move_and_delete_note() {
    let app = build_test_app();
    let work = create_category(&app.router, "Work").await;
    let home = create_category(&app.router, "Home").await;
    let note = create_note(&app.router, &work, "Standup").await;
    let id = note["id"].as_str().unwrap();

    let patched = send(
        &app.router,
        Method::PATCH,
        &format!("/api/notes/{id}"),
        Some(USER),
        Some(json!({"title": "Retro", "content": "<p>ok</p>"})),
    )
    .await;
    let json = body_json(patched).await;
    assert_eq!(json["data"]["title"], "Retro");
    assert_eq!(json["data"]["content"], "<p>ok</p>");

    let moved = post_json(
        &app.router,
        &format!("/api/notes/{id}/move"),
        json!({"category_id": home}),
    )
    .await;
    let json = body_json(moved).await;
    assert_eq!(json["data"]["category_id"], home.as_str());

    let deleted = send(
        &app.router,
        Method::DELETE,
        &format!("/api/notes/{id}"),
        Some(USER),
        None,
    )
    .await;
    let json = body_json(deleted).await;
    assert_eq!(json["data"], id);
}

#[tokio::test]
async fn bulk_delete_returns_count_removed() {
    let app = build_test_app();
    let work = create_category(&app.router, "Work").await;
    let a = create_note(&app.router, &work, "a").await;

    let response = post_json(
        &app.router,
        "/api/notes/bulk-delete",
        json!({"ids": [a["id"], uuid::Uuid::now_v7()]}),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["isSuccess"], true);
    assert_eq!(json["data"], 1);

    let empty = post_json(&app.router, "/api/notes/bulk-delete", json!({"ids": []})).await;
    let json = body_json(empty).await;
    assert_eq!(json["data"], 0);
}

#[tokio::test]
async fn category_update_and_delete_routes() {
    let app = build_test_app();
    let work = create_category(&app.router, "Work").await;

    let updated = send(
        &app.router,
        Method::PATCH,
        &format!("/api/categories/{work}"),
        Some(USER),
        Some(json!({"name": "Office"})),
    )
    .await;
    let json = body_json(updated).await;
    assert_eq!(json["data"]["name"], "Office");

    let foreign = send(
        &app.router,
        Method::GET,
        &format!("/api/categories/{work}"),
        Some("u2"),
        None,
    )
    .await;
    let json = body_json(foreign).await;
    assert_eq!(json["message"], messages::CATEGORY_ACCESS_DENIED);

    let deleted = send(
        &app.router,
        Method::DELETE,
        &format!("/api/categories/{work}"),
        Some(USER),
        None,
    )
    .await;
    let json = body_json(deleted).await;
    assert_eq!(json["isSuccess"], true);

    let listed = body_json(get(&app.router, "/api/categories").await).await;
    assert!(listed["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn board_view_is_cached_until_a_mutation() {
    let app = build_test_app();
    let work = create_category(&app.router, "Work").await;

    let first = get(&app.router, "/views/board").await;
    assert_eq!(first.headers()["x-view-cache"], "miss");

    let second = get(&app.router, "/views/board").await;
    assert_eq!(second.headers()["x-view-cache"], "hit");

    create_note(&app.router, &work, "Standup").await;

    let third = get(&app.router, "/views/board").await;
    assert_eq!(third.headers()["x-view-cache"], "miss");
    let json = body_json(third).await;
    let notes = json["data"]["notes_by_category"][work.as_str()]
        .as_array()
        .unwrap();
    assert_eq!(notes.len(), 1);
}

#[tokio::test]
async fn note_view_refuses_other_users() {
    let app = build_test_app();
    let work = create_category(&app.router, "Work").await;
    let note = create_note(&app.router, &work, "Standup").await;
    let id = note["id"].as_str().unwrap();

    let mine = body_json(get(&app.router, &format!("/views/notes/{id}")).await).await;
    assert_eq!(mine["data"]["note"]["title"], "Standup");
    assert_eq!(mine["data"]["category"]["name"], "Work");

    let theirs = send(
        &app.router,
        Method::GET,
        &format!("/views/notes/{id}"),
        Some("u2"),
        None,
    )
    .await;
    let json = body_json(theirs).await;
    assert_eq!(json["isSuccess"], false);
    assert_eq!(json["message"], messages::NOTE_ACCESS_DENIED);
}

#[tokio::test]
async fn renaming_a_category_refreshes_its_note_views() {
    let app = build_test_app();
    let work = create_category(&app.router, "Work").await;
    let note = create_note(&app.router, &work, "Standup").await;
    let uri = format!("/views/notes/{}", note["id"].as_str().unwrap());

    let first = get(&app.router, &uri).await;
    assert_eq!(first.headers()["x-view-cache"], "miss");

    send(
        &app.router,
        Method::PATCH,
        &format!("/api/categories/{work}"),
        Some(USER),
        Some(json!({"name": "Office", "color": "#112233"})),
    )
    .await;

    let second = get(&app.router, &uri).await;
    assert_eq!(second.headers()["x-view-cache"], "miss");
    let json = body_json(second).await;
    assert_eq!(json["data"]["category"]["name"], "Office");
    assert_eq!(json["data"]["category"]["color"], "#112233");
}

#[tokio::test]
async fn failed_views_are_not_cached() {
    let app = build_test_app();
    app.store.set_failing(true);

    let first = get(&app.router, "/views/board").await;
    let json = body_json(first).await;
    assert_eq!(json["message"], messages::GET_CATEGORIES_FAILED);

    app.store.set_failing(false);
    let second = get(&app.router, "/views/board").await;
    assert_eq!(second.headers()["x-view-cache"], "miss");
    assert_eq!(body_json(second).await["isSuccess"], true);
}
