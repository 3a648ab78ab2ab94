//! Fixture builders shared by the database integration tests.

#![allow(dead_code)]

use sqlx::PgPool;
use thrush_db::models::category::{Category, CreateCategory};
use thrush_db::models::post::{CreatePost, Post};
use thrush_db::models::product::{CreateProduct, Product};
use thrush_db::models::user::{CreateUser, User};
use thrush_db::repositories::{CategoryRepo, PostRepo, ProductRepo, UserRepo};
use thrush_core::product::ProductDetails;

pub async fn create_user(pool: &PgPool, username: &str) -> User {
    let mut conn = pool.acquire().await.unwrap();
    UserRepo::create(
        &mut conn,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            mobile: None,
            password_hash: "not-a-real-hash".to_string(),
            first_name: None,
            last_name: None,
            image: None,
            is_active: true,
            is_superuser: false,
        },
    )
    .await
    .unwrap()
}

pub async fn create_category(pool: &PgPool, name: &str, parent_id: Option<i64>) -> Category {
    let mut conn = pool.acquire().await.unwrap();
    CategoryRepo::create(
        &mut conn,
        &CreateCategory {
            name: name.to_string(),
            parent_id,
        },
    )
    .await
    .unwrap()
}

pub fn post_input(slug: &str) -> CreatePost {
    CreatePost {
        title: format!("Post {slug}"),
        brief: "brief".to_string(),
        content: "content".to_string(),
        slug: slug.to_string(),
        image: None,
        is_draft: None,
        previous_id: None,
        category_id: None,
        tag_ids: Vec::new(),
    }
}

pub async fn create_post(pool: &PgPool, user_id: i64, category_id: i64, slug: &str) -> Post {
    let mut conn = pool.acquire().await.unwrap();
    PostRepo::create(&mut conn, user_id, category_id, &post_input(slug))
        .await
        .unwrap()
}

/// Wait until at least `count` backends in this database are blocked on a lock.
pub async fn wait_for_lock_waiters(pool: &PgPool, count: i64) {
    for _ in 0..250 {
        let waiting = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM pg_stat_activity
             WHERE datname = current_database() AND wait_event_type = 'Lock'",
        )
        .fetch_one(pool)
        .await
        .unwrap();
        if waiting >= count {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for {count} blocked backends");
}

pub async fn create_product(pool: &PgPool, seller_id: i64, category_id: i64, code: &str) -> Product {
    let mut conn = pool.acquire().await.unwrap();
    ProductRepo::create(
        &mut conn,
        seller_id,
        &CreateProduct {
            category_id,
            name: format!("Product {code}"),
            description: String::new(),
            product_code: code.to_string(),
            image: None,
            details: ProductDetails::Ebook {
                file_format: "epub".to_string(),
                file_size_bytes: 2048,
            },
        },
    )
    .await
    .unwrap()
}
