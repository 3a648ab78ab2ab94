//! On-create hooks observed through the HTTP surface: permission templates,
//! default group assignment and their failure modes.

mod common;

use axum::http::StatusCode;
use common::{
    build_test_app, build_test_app_with, create_user, expect_data, post_json, post_json_auth,
    seed_post, test_config, token_for, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;
use thrush_core::permissions::parse_templates;
use thrush_db::repositories::{GroupRepo, PermissionRepo, UserRepo};

fn registration(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "email": format!("{username}@example.com"),
        "password": TEST_PASSWORD,
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_registration_survives_missing_default_group(pool: PgPool) {
    assert!(GroupRepo::delete_by_name(&pool, "registered_users").await.unwrap());
    let test = build_test_app(pool.clone());

    let response = post_json(test.app(), "/api/v1/auth/register", registration("alice")).await;
    let user = expect_data(response, StatusCode::CREATED).await;
    let user_id = user["id"].as_i64().unwrap();

    assert!(UserRepo::group_names(&pool, user_id).await.unwrap().is_empty());
    // The other hooks still ran.
    assert!(test.sender.last_for(user_id).is_some());
    let grants = PermissionRepo::user_object_grants(&pool, user_id, "user", user_id)
        .await
        .unwrap();
    assert_eq!(grants.len(), 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_permission_template_is_skipped(pool: PgPool) {
    assert!(PermissionRepo::delete_by_codename(&pool, "post.view").await.unwrap());
    let test = build_test_app(pool.clone());
    let author = create_user(&pool, "author", true).await;

    let (_, post_id) = seed_post(test.app(), &token_for(&author), "partial").await;

    let grants = PermissionRepo::user_object_grants(&pool, author.id, "post", post_id)
        .await
        .unwrap();
    let codenames: Vec<_> = grants.iter().map(|g| g.codename.as_str()).collect();
    assert_eq!(codenames, vec!["post.change", "post.delete"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_groups_with_class_permission_receive_object_grants(pool: PgPool) {
    let reviewers = GroupRepo::create(&pool, "reviewers").await.unwrap();
    let change = PermissionRepo::find_by_codename(&pool, "post.change")
        .await
        .unwrap()
        .unwrap();
    assert!(PermissionRepo::grant_class_to_group(&pool, reviewers.id, change.id)
        .await
        .unwrap());

    let test = build_test_app(pool.clone());
    let admin = create_user(&pool, "admin", true).await;
    let (_, post_id) = seed_post(test.app(), &token_for(&admin), "reviewed").await;

    let grants = PermissionRepo::group_object_grants(&pool, reviewers.id, "post", post_id)
        .await
        .unwrap();
    let codenames: Vec<_> = grants.iter().map(|g| g.codename.as_str()).collect();
    assert_eq!(codenames, vec!["post.change"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_creatorless_entity_grants_only_groups(pool: PgPool) {
    let test = build_test_app(pool.clone());
    let author = create_user(&pool, "author", false).await;

    let tag = expect_data(
        post_json_auth(test.app(), "/api/v1/tags", &token_for(&author), json!({ "name": "misc" }))
            .await,
        StatusCode::CREATED,
    )
    .await;
    let tag_id = tag["id"].as_i64().unwrap();

    // Only registered_users holds a tag template permission (tag.view).
    assert_eq!(
        PermissionRepo::count_object_grants(&pool, "tag", tag_id).await.unwrap(),
        1
    );
    assert!(PermissionRepo::user_object_grants(&pool, author.id, "tag", tag_id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_custom_template_takes_effect_once_permission_exists(pool: PgPool) {
    let mut config = test_config();
    config.lifecycle.permission_templates = parse_templates("{model}.view,{model}.publish").unwrap();

    let publish = PermissionRepo::create(&pool, "post.publish", "Can publish post")
        .await
        .unwrap();
    let editor = create_user(&pool, "editor", false).await;
    assert!(PermissionRepo::grant_class_to_user(&pool, editor.id, publish.id)
        .await
        .unwrap());
    let admin = create_user(&pool, "admin", true).await;

    let test = build_test_app_with(pool.clone(), config);
    let (category_id, post_id) = seed_post(test.app(), &token_for(&admin), "custom").await;

    // Class-wide holders are reached through groups only; the creator gets
    // every resolved template.
    let admin_grants = PermissionRepo::user_object_grants(&pool, admin.id, "post", post_id)
        .await
        .unwrap();
    let codenames: Vec<_> = admin_grants.iter().map(|g| g.codename.as_str()).collect();
    assert_eq!(codenames, vec!["post.publish", "post.view"]);
    assert!(PermissionRepo::user_object_grants(&pool, editor.id, "post", post_id)
        .await
        .unwrap()
        .is_empty());

    // `category.publish` does not exist: the category still got its view grant.
    assert_eq!(
        PermissionRepo::count_object_grants(&pool, "category", category_id)
            .await
            .unwrap(),
        1
    );
}
