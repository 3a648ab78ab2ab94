//! `AppError` to HTTP response mapping, exercised without a server.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use thrush_api::error::AppError;
use thrush_core::error::CoreError;
use thrush_db::error::RepoError;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "post",
        id: 42,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "post with id 42 not found");
}

#[tokio::test]
async fn not_found_by_key_names_the_key() {
    let err = AppError::Core(CoreError::NotFoundByKey {
        entity: "tag",
        key: "rust".into(),
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "tag 'rust' not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("value must be between 1 and 10".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "value must be between 1 and 10");
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let (status, json) = error_to_response(AppError::BadRequest("Unknown entity type: x".into())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Conflict("already bookmarked".into()))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn auth_errors_return_401_and_403() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Unauthorized("Missing token".into()))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::Forbidden("post.change".into()))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn configuration_missing_is_sanitized() {
    let err = AppError::Core(CoreError::ConfigurationMissing(
        "Permission 'user.approve' does not exist".into(),
    ));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn internal_error_is_sanitized() {
    let (status, json) =
        error_to_response(AppError::InternalError("hash backend exploded".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn repo_errors_keep_their_domain_meaning() {
    let err: AppError = RepoError::Core(CoreError::Conflict("dup".into())).into();
    let (status, _) = error_to_response(err).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let err: AppError = RepoError::Database(sqlx::Error::PoolTimedOut).into();
    let (status, json) = error_to_response(err).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}
