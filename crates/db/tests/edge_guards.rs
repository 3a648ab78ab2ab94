//! Integration tests for the star and bookmark edge guards.

mod common;

use assert_matches::assert_matches;
use sqlx::PgPool;
use thrush_core::error::CoreError;
use thrush_core::rating::{StarBounds, SubmitOutcome};
use thrush_db::error::RepoError;
use thrush_db::repositories::{BookmarkRepo, PostRepo, StarRepo};

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_star_submit_creates_then_updates(pool: PgPool) {
    let user = common::create_user(&pool, "erin").await;
    let category = common::create_category(&pool, "News", None).await;
    let post = common::create_post(&pool, user.id, category.id, "rated").await;
    let mut conn = pool.acquire().await.unwrap();

    let first = StarRepo::submit(&mut conn, StarBounds::default(), user.id, post.id, 7)
        .await
        .unwrap();
    assert_matches!(first, SubmitOutcome::Created(ref star) if star.value == 7);

    let second = StarRepo::submit(&mut conn, StarBounds::default(), user.id, post.id, 3)
        .await
        .unwrap();
    assert_matches!(second, SubmitOutcome::Updated(ref star) if star.value == 3);

    assert_eq!(first.into_inner().id, second.into_inner().id);
    assert_eq!(StarRepo::count_for_post(&pool, post.id).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_star_out_of_range_writes_nothing(pool: PgPool) {
    let user = common::create_user(&pool, "erin").await;
    let category = common::create_category(&pool, "News", None).await;
    let post = common::create_post(&pool, user.id, category.id, "bounded").await;
    let mut conn = pool.acquire().await.unwrap();

    for value in [0, 11, -3] {
        let result = StarRepo::submit(&mut conn, StarBounds::default(), user.id, post.id, value).await;
        assert_matches!(result, Err(RepoError::Core(CoreError::Validation(_))));
    }
    assert_eq!(StarRepo::count_for_post(&pool, post.id).await.unwrap(), 0);

    // An existing star is left untouched by a rejected update.
    StarRepo::submit(&mut conn, StarBounds::default(), user.id, post.id, 5)
        .await
        .unwrap();
    let _ = StarRepo::submit(&mut conn, StarBounds::default(), user.id, post.id, 99).await;
    let star = StarRepo::find_for_user_post(&pool, user.id, post.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(star.value, 5);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_star_on_deleted_post_is_not_found(pool: PgPool) {
    let user = common::create_user(&pool, "erin").await;
    let category = common::create_category(&pool, "News", None).await;
    let post = common::create_post(&pool, user.id, category.id, "gone").await;
    PostRepo::soft_delete(&pool, post.id).await.unwrap();

    let mut conn = pool.acquire().await.unwrap();
    let result = StarRepo::submit(&mut conn, StarBounds::default(), user.id, post.id, 4).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::NotFound { entity: "post", .. })));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookmark_add_twice_conflicts(pool: PgPool) {
    let user = common::create_user(&pool, "frank").await;
    let category = common::create_category(&pool, "News", None).await;
    let post = common::create_post(&pool, user.id, category.id, "saved").await;

    BookmarkRepo::add_post(&pool, user.id, post.id).await.unwrap();
    let again = BookmarkRepo::add_post(&pool, user.id, post.id).await;
    assert_matches!(again, Err(RepoError::Core(CoreError::Conflict(_))));
    assert_eq!(BookmarkRepo::count_for_post(&pool, post.id).await.unwrap(), 1);

    let mine = PostRepo::list_bookmarked_by(&pool, user.id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].post.bookmarks_count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookmark_remove_missing_is_not_found(pool: PgPool) {
    let user = common::create_user(&pool, "frank").await;
    let category = common::create_category(&pool, "News", None).await;
    let post = common::create_post(&pool, user.id, category.id, "unsaved").await;

    let result = BookmarkRepo::remove_post(&pool, user.id, post.id).await;
    assert_matches!(result, Err(RepoError::Core(CoreError::NotFound { entity: "bookmark", .. })));

    BookmarkRepo::add_post(&pool, user.id, post.id).await.unwrap();
    BookmarkRepo::remove_post(&pool, user.id, post.id).await.unwrap();
    assert_eq!(BookmarkRepo::count_for_post(&pool, post.id).await.unwrap(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_product_bookmarks_follow_same_rules(pool: PgPool) {
    let user = common::create_user(&pool, "gina").await;
    let category = common::create_category(&pool, "Books", None).await;
    let product = common::create_product(&pool, user.id, category.id, "EB-1").await;

    BookmarkRepo::add_product(&pool, user.id, product.id).await.unwrap();
    assert_matches!(
        BookmarkRepo::add_product(&pool, user.id, product.id).await,
        Err(RepoError::Core(CoreError::Conflict(_)))
    );
    BookmarkRepo::remove_product(&pool, user.id, product.id).await.unwrap();
    assert_matches!(
        BookmarkRepo::remove_product(&pool, user.id, product.id).await,
        Err(RepoError::Core(CoreError::NotFound { .. }))
    );
}
