//! Root-level health endpoint.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_health_reports_database(pool: PgPool) {
    let test = build_test_app(pool);

    let response = get(test.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert_eq!(json["pending_verifications"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_route_is_404(pool: PgPool) {
    let test = build_test_app(pool);

    let response = get(test.app(), "/api/v1/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
