//! HTTP-level tests for stars and bookmarks.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, create_user, delete_auth, expect_data, get, get_auth,
    post_json_auth, seed_post, token_for,
};
use serde_json::json;
use sqlx::PgPool;
use thrush_db::repositories::PermissionRepo;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_star_is_created_then_updated(pool: PgPool) {
    let test = build_test_app(pool.clone());
    let admin = create_user(&pool, "admin", true).await;
    let reader = create_user(&pool, "reader", false).await;
    let (_, post_id) = seed_post(test.app(), &token_for(&admin), "starred").await;
    let token = token_for(&reader);

    let created = expect_data(
        post_json_auth(test.app(), "/api/v1/stars", &token, json!({ "post_id": post_id, "value": 4 }))
            .await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["value"], 4);
    let star_id = created["id"].as_i64().unwrap();
    let grants_after_create = PermissionRepo::count_object_grants(&pool, "star", star_id)
        .await
        .unwrap();
    assert!(grants_after_create > 0);

    let updated = expect_data(
        post_json_auth(test.app(), "/api/v1/stars", &token, json!({ "post_id": post_id, "value": 9 }))
            .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["id"], created["id"]);
    assert_eq!(updated["value"], 9);
    // Resubmitting updates the row without granting anything new.
    assert_eq!(
        PermissionRepo::count_object_grants(&pool, "star", star_id).await.unwrap(),
        grants_after_create
    );

    let detail = expect_data(
        get(test.app(), &format!("/api/v1/posts/{post_id}")).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(detail["stars_average"], 9.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_star_out_of_range_is_rejected(pool: PgPool) {
    let test = build_test_app(pool.clone());
    let admin = create_user(&pool, "admin", true).await;
    let (_, post_id) = seed_post(test.app(), &token_for(&admin), "bounded").await;
    let token = token_for(&admin);

    for value in [0, 11] {
        let response = post_json_auth(
            test.app(),
            "/api/v1/stars",
            &token,
            json!({ "post_id": post_id, "value": value }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "value {value}");
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_star_on_deleted_post_is_not_found(pool: PgPool) {
    let test = build_test_app(pool.clone());
    let admin = create_user(&pool, "admin", true).await;
    let token = token_for(&admin);
    let (_, post_id) = seed_post(test.app(), &token, "doomed").await;

    let deleted = delete_auth(test.app(), &format!("/api/v1/posts/{post_id}"), &token).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let response = post_json_auth(
        test.app(),
        "/api/v1/stars",
        &token,
        json!({ "post_id": post_id, "value": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_star_requires_authentication(pool: PgPool) {
    let test = build_test_app(pool);

    let response = common::post_json(
        test.app(),
        "/api/v1/stars",
        json!({ "post_id": 1, "value": 5 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookmark_lifecycle(pool: PgPool) {
    let test = build_test_app(pool.clone());
    let admin = create_user(&pool, "admin", true).await;
    let reader = create_user(&pool, "reader", false).await;
    let (_, post_id) = seed_post(test.app(), &token_for(&admin), "saved").await;
    let token = token_for(&reader);

    let added = post_json_auth(test.app(), "/api/v1/bookmarks", &token, json!({ "post_id": post_id })).await;
    assert_eq!(added.status(), StatusCode::CREATED);

    let duplicate =
        post_json_auth(test.app(), "/api/v1/bookmarks", &token, json!({ "post_id": post_id })).await;
    assert_eq!(duplicate.status(), StatusCode::CONFLICT);

    let mine = expect_data(
        get_auth(test.app(), "/api/v1/bookmarks", &token).await,
        StatusCode::OK,
    )
    .await;
    let ids: Vec<_> = mine.as_array().unwrap().iter().map(|p| p["id"].clone()).collect();
    assert_eq!(ids, vec![json!(post_id)]);

    let uri = format!("/api/v1/bookmarks/{post_id}");
    assert_eq!(delete_auth(test.app(), &uri, &token).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(delete_auth(test.app(), &uri, &token).await.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_bookmark_unknown_post_is_not_found(pool: PgPool) {
    let test = build_test_app(pool.clone());
    let reader = create_user(&pool, "reader", false).await;

    let response = post_json_auth(
        test.app(),
        "/api/v1/bookmarks",
        &token_for(&reader),
        json!({ "post_id": 999_999 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
