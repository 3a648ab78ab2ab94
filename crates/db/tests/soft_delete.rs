//! Integration tests for soft-delete and restore behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted rows are hidden from `find_by_id` and list queries
//! - Soft-delete is idempotent (second call returns `false`)
//! - The row survives and stays reachable through include-deleted reads
//! - Restoring makes the row visible again
//! - Unique names only apply among visible rows

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use thrush_db::error::RepoError;
use thrush_db::models::category::CategoryFilter;
use thrush_db::models::post::PostFilter;
use thrush_db::models::tag::{CreateTag, Tag};
use thrush_db::repositories::{CategoryRepo, PostRepo, TagRepo, TrashRepo};
use thrush_db::soft_delete;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_from_find_and_list(pool: PgPool) {
    let user = common::create_user(&pool, "writer").await;
    let category = common::create_category(&pool, "News", None).await;
    let post = common::create_post(&pool, user.id, category.id, "hidden").await;

    let deleted = PostRepo::soft_delete(&pool, post.id).await.unwrap();
    assert!(deleted, "soft_delete should return true on first call");

    assert!(PostRepo::find_by_id(&pool, post.id).await.unwrap().is_none());
    let listed = PostRepo::list(&pool, &PostFilter::default()).await.unwrap();
    assert!(!listed.iter().any(|p| p.post.post.id == post.id));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_is_idempotent(pool: PgPool) {
    let user = common::create_user(&pool, "writer").await;
    let category = common::create_category(&pool, "News", None).await;
    let post = common::create_post(&pool, user.id, category.id, "twice").await;

    assert!(PostRepo::soft_delete(&pool, post.id).await.unwrap());
    assert!(
        !PostRepo::soft_delete(&pool, post.id).await.unwrap(),
        "second soft_delete should be a no-op"
    );
    assert!(!PostRepo::soft_delete(&pool, 999_999).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleted_row_is_kept_and_timestamp_refreshed(pool: PgPool) {
    let user = common::create_user(&pool, "writer").await;
    let category = common::create_category(&pool, "News", None).await;
    let post = common::create_post(&pool, user.id, category.id, "kept").await;

    PostRepo::soft_delete(&pool, post.id).await.unwrap();

    let row = PostRepo::find_by_id_include_deleted(&pool, post.id)
        .await
        .unwrap()
        .expect("row should still exist");
    assert!(row.is_deleted);
    assert!(row.updated_at >= post.updated_at);
    assert_eq!(row.created_at, post.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_restore_makes_visible_again(pool: PgPool) {
    let category = common::create_category(&pool, "Archive", None).await;

    soft_delete::soft_delete::<thrush_db::models::category::Category, _>(&pool, category.id)
        .await
        .unwrap();
    assert!(CategoryRepo::find_by_id(&pool, category.id).await.unwrap().is_none());

    let trashed = TrashRepo::list_trashed(&pool, Some("categories")).await.unwrap();
    assert!(trashed.iter().any(|item| item.id == category.id));

    assert!(TrashRepo::restore(&pool, "categories", category.id).await.unwrap());
    assert!(CategoryRepo::find_by_id(&pool, category.id).await.unwrap().is_some());
    assert!(!TrashRepo::restore(&pool, "categories", category.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unique_name_applies_to_visible_rows_only(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let input = CreateTag {
        name: "rust".to_string(),
    };
    let first = TagRepo::create(&mut conn, &input).await.unwrap();

    let duplicate = TagRepo::create(&mut conn, &input).await;
    assert_matches!(duplicate, Err(sqlx::Error::Database(_)));

    soft_delete::soft_delete::<Tag, _>(&pool, first.id).await.unwrap();
    let second = TagRepo::create(&mut conn, &input).await.unwrap();
    assert_ne!(first.id, second.id);

    // Restoring the first would now duplicate a visible name.
    let restored = TrashRepo::restore(&pool, "tags", first.id).await;
    assert_matches!(restored, Err(sqlx::Error::Database(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_orders_by_creation(pool: PgPool) {
    let a = common::create_category(&pool, "A", None).await;
    let b = common::create_category(&pool, "B", None).await;

    let listed = CategoryRepo::list(&pool, &CategoryFilter::default()).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![a.id, b.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_post_create_rejects_deleted_category(pool: PgPool) {
    let user = common::create_user(&pool, "writer").await;
    let category = common::create_category(&pool, "Gone", None).await;
    soft_delete::soft_delete::<thrush_db::models::category::Category, _>(&pool, category.id)
        .await
        .unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let result = PostRepo::create(
        &mut conn,
        user.id,
        category.id,
        &thrush_db::models::post::CreatePost {
            title: "t".into(),
            brief: "b".into(),
            content: "c".into(),
            slug: "orphan".into(),
            image: None,
            is_draft: None,
            previous_id: None,
            category_id: None,
            tag_ids: Vec::new(),
        },
    )
    .await;

    assert_matches!(
        result,
        Err(RepoError::Core(thrush_core::error::CoreError::NotFound { entity: "category", .. }))
    );
}
