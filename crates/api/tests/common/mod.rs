//! Shared harness for the HTTP integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use chrono::Utc;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use thrush_api::auth::jwt::{generate_access_token, JwtConfig};
use thrush_api::auth::password::hash_password;
use thrush_api::config::{LifecycleConfig, ServerConfig};
use thrush_api::router::build_app_router;
use thrush_api::state::AppState;
use thrush_core::groups::GROUP_REGISTERED_USERS;
use thrush_core::permissions::default_templates;
use thrush_core::placeholder::default_category_rules;
use thrush_core::rating::StarBounds;
use thrush_core::test_support::MutableClock;
use thrush_core::types::DbId;
use thrush_core::verification::{CodeCipher, CodeRange};
use thrush_db::models::user::{CreateUser, User};
use thrush_db::repositories::{GroupRepo, UserRepo};
use thrush_notify::{DeliveryError, VerificationRecipient, VerificationSender};

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_VERIFICATION_KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";
pub const TEST_PASSWORD: &str = "correct horse battery";

/// A code handed to the delivery channel.
#[derive(Debug, Clone)]
pub struct SentCode {
    pub user_id: DbId,
    pub code: u64,
    pub key: String,
}

/// Delivery channel that remembers every code instead of sending it.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentCode>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<SentCode> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_for(&self, user_id: DbId) -> Option<SentCode> {
        self.sent().into_iter().rev().find(|s| s.user_id == user_id)
    }
}

#[async_trait]
impl VerificationSender for RecordingSender {
    async fn send_verification_code(
        &self,
        recipient: &VerificationRecipient,
        code: u64,
        key: &str,
    ) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(SentCode {
            user_id: recipient.user_id,
            code,
            key: key.to_string(),
        });
        Ok(())
    }
}

pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        lifecycle: LifecycleConfig {
            permission_templates: default_templates(),
            star_bounds: StarBounds::new(1, 10).unwrap(),
            default_user_group: GROUP_REGISTERED_USERS.to_string(),
            code_range: CodeRange::for_digits(6).unwrap(),
            code_life_time: Duration::from_secs(180),
            code_cipher: CodeCipher::from_base64_key(TEST_VERIFICATION_KEY).unwrap(),
            placeholder_rules: default_category_rules(),
        },
    }
}

/// Everything a test needs to drive the app and observe its side effects.
pub struct TestApp {
    pub router: Router,
    pub clock: Arc<MutableClock>,
    pub sender: Arc<RecordingSender>,
    pub pool: PgPool,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router (same middleware stack as the binary)
/// with a controllable clock and a recording delivery channel.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, test_config())
}

/// Like [`build_test_app`] with a caller-supplied configuration.
pub fn build_test_app_with(pool: PgPool, config: ServerConfig) -> TestApp {
    let clock = Arc::new(MutableClock::new(Utc::now()));
    let sender = Arc::new(RecordingSender::default());
    let state = AppState::new(pool.clone(), config, clock.clone(), sender.clone());
    let router = build_app_router(state).unwrap();
    TestApp {
        router,
        clock,
        sender,
        pool,
    }
}

/// Insert a user directly and put it in the default group, as registration
/// would. Hooks do not run.
pub async fn create_user(pool: &PgPool, username: &str, is_superuser: bool) -> User {
    let user = create_user_without_groups(pool, username, is_superuser).await;
    if let Some(group) = GroupRepo::find_by_name(pool, GROUP_REGISTERED_USERS).await.unwrap() {
        UserRepo::add_to_group(pool, user.id, group.id).await.unwrap();
    }
    user
}

/// Insert a user directly with no group memberships.
pub async fn create_user_without_groups(pool: &PgPool, username: &str, is_superuser: bool) -> User {
    let mut conn = pool.acquire().await.unwrap();
    UserRepo::create(
        &mut conn,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            mobile: None,
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            first_name: None,
            last_name: None,
            image: None,
            is_active: true,
            is_superuser,
        },
    )
    .await
    .unwrap()
}

/// Mint an access token for `user` signed with the test secret.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, user.is_superuser, &test_config().jwt).unwrap()
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request("POST", uri, None, &body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request("POST", uri, Some(token), &body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request("PUT", uri, Some(token), &body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Assert the status and return the `data` member of the envelope.
pub async fn expect_data(response: Response<Body>, status: StatusCode) -> serde_json::Value {
    assert_eq!(response.status(), status);
    body_json(response).await["data"].clone()
}

/// Create a category and one post in it over HTTP, returning their ids.
pub async fn seed_post(app: Router, token: &str, slug: &str) -> (DbId, DbId) {
    let category = expect_data(
        post_json_auth(
            app.clone(),
            "/api/v1/categories",
            token,
            serde_json::json!({ "name": format!("category-{slug}") }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    let category_id = category["id"].as_i64().unwrap();

    let post = expect_data(
        post_json_auth(
            app,
            &format!("/api/v1/categories/{category_id}/posts"),
            token,
            serde_json::json!({
                "title": format!("Post {slug}"),
                "brief": "brief",
                "content": "content",
                "slug": slug,
            }),
        )
        .await,
        StatusCode::CREATED,
    )
    .await;
    (category_id, post["id"].as_i64().unwrap())
}
