//! Integration tests for the PostgreSQL category and note repositories.
//!
//! Covers:
//! - create/get equality and generated fields
//! - base-first category ordering
//! - cascade on category delete
//! - bulk delete with unknown ids
//! - non-decreasing updated_at
//!
//! Each test runs in its own schema via `TestDatabase`.

use noteboard_db::test_fixtures::TestDatabase;
use noteboard_db::{
    defaults, messages, CategoryRepository, Error, NewNote, NoteRepository, UpdateCategory,
    UpdateNote,
};
use uuid::Uuid;

async fn test_db() -> TestDatabase {
    dotenvy::dotenv().ok();
    TestDatabase::new().await
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_create_then_get_category_and_note() {
    let test_db = test_db().await;
    let work = test_db.category("u1", "Work").await;

    let fetched = test_db.db.categories.get(work.id).await.unwrap().unwrap();
    assert_eq!(fetched, work);

    let note = test_db.note("u1", work.id, "Standup").await;
    assert_eq!(note.category_id, work.id);
    assert_eq!(note.content, "");
    assert_eq!(note.created_at, note.updated_at);

    let listed = test_db.db.notes.list_by_user("u1").await.unwrap();
    assert_eq!(listed, vec![note]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_get_missing_rows_returns_none() {
    let test_db = test_db().await;

    assert!(test_db.db.categories.get(Uuid::now_v7()).await.unwrap().is_none());
    assert!(test_db.db.notes.get(Uuid::now_v7()).await.unwrap().is_none());
    assert!(test_db
        .db
        .notes
        .update(Uuid::now_v7(), UpdateNote::default())
        .await
        .unwrap()
        .is_none());
    assert!(test_db.db.notes.delete(Uuid::now_v7()).await.unwrap().is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_base_categories_listed_before_user_categories() {
    let test_db = test_db().await;
    let alpha = test_db.category("u1", "Alpha").await;
    test_db.base_category("Zeta").await;
    test_db.base_category("Beta").await;
    test_db.category("u2", "Hidden").await;

    let listed = test_db
        .db
        .categories
        .list_for_user_and_base("u1")
        .await
        .unwrap();
    let names: Vec<&str> = listed.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Beta", "Zeta", "Alpha"]);

    let own = test_db.db.categories.list_by_user("u1").await.unwrap();
    assert_eq!(own, vec![alpha]);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_seed_base_categories_is_idempotent() {
    let test_db = test_db().await;
    let seeds = defaults::BASE_CATEGORIES;

    let first = test_db.db.seed_base_categories(seeds).await.unwrap();
    let second = test_db.db.seed_base_categories(seeds).await.unwrap();
    assert_eq!(first, seeds.len() as u64);
    assert_eq!(second, 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_category_update_is_partial() {
    let test_db = test_db().await;
    let work = test_db.category("u1", "Work").await;

    let updated = test_db
        .db
        .categories
        .update(
            work.id,
            UpdateCategory {
                color: Some("#000000".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Work");
    assert_eq!(updated.color, "#000000");

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_category_delete_cascades_to_notes() {
    let test_db = test_db().await;
    let work = test_db.category("u1", "Work").await;
    let a = test_db.note("u1", work.id, "a").await;
    let b = test_db.note("u1", work.id, "b").await;

    let deleted = test_db.db.categories.delete(work.id).await.unwrap();
    assert_eq!(deleted, Some(work.id));

    assert!(test_db.db.notes.get(a.id).await.unwrap().is_none());
    assert!(test_db.db.notes.get(b.id).await.unwrap().is_none());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_note_insert_with_unknown_category_fails() {
    let test_db = test_db().await;

    let err = test_db
        .db
        .notes
        .create(NewNote {
            user_id: "u1".to_string(),
            category_id: Uuid::now_v7(),
            title: "orphan".to_string(),
            content: String::new(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Persistence(ref m) if m == messages::CREATE_NOTE_FAILED));

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_bulk_delete_counts_existing_rows_only() {
    let test_db = test_db().await;
    let work = test_db.category("u1", "Work").await;
    let a = test_db.note("u1", work.id, "a").await;
    let b = test_db.note("u1", work.id, "b").await;

    let removed = test_db
        .db
        .notes
        .delete_many(&[a.id, b.id, Uuid::now_v7()])
        .await
        .unwrap();
    assert_eq!(removed, 2);

    let none = test_db.db.notes.delete_many(&[]).await.unwrap();
    assert_eq!(none, 0);

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_update_moves_note_and_bumps_updated_at() {
    let test_db = test_db().await;
    let work = test_db.category("u1", "Work").await;
    let home = test_db.category("u1", "Home").await;
    let note = test_db.note("u1", work.id, "Standup").await;

    let moved = test_db
        .db
        .notes
        .update(
            note.id,
            UpdateNote {
                category_id: Some(home.id),
                content: Some("<p>notes</p>".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(moved.category_id, home.id);
    assert_eq!(moved.title, "Standup");
    assert_eq!(moved.created_at, note.created_at);
    assert!(moved.updated_at >= note.updated_at);

    let in_work = test_db
        .db
        .notes
        .list_by_category(work.id, "u1")
        .await
        .unwrap();
    assert!(in_work.is_empty());

    test_db.cleanup().await;
}

#[tokio::test]
#[ignore = "Requires DATABASE_URL with a reachable PostgreSQL"]
async fn test_notes_listed_most_recently_updated_first() {
    let test_db = test_db().await;
    let work = test_db.category("u1", "Work").await;
    let older = test_db.note("u1", work.id, "older").await;
    let newer = test_db.note("u1", work.id, "newer").await;

    // Touch the older note so it becomes the most recent.
    test_db
        .db
        .notes
        .update(
            older.id,
            UpdateNote {
                title: Some("older, edited".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let listed = test_db
        .db
        .notes
        .list_by_category(work.id, "u1")
        .await
        .unwrap();
    let ids: Vec<Uuid> = listed.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![older.id, newer.id]);

    test_db.cleanup().await;
}
