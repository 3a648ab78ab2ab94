//! Handlers for post and product bookmarks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use thrush_core::types::DbId;
use thrush_db::models::bookmark::{CreateBookmark, PostBookmark, ProductBookmark};
use thrush_db::models::post::PostDetail;
use thrush_db::repositories::{BookmarkRepo, PostRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/bookmarks
///
/// The caller's bookmarked posts.
pub async fn list_my_bookmarks(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<PostDetail>>>> {
    let posts = PostRepo::list_bookmarked_by(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/v1/bookmarks
///
/// 409 when the post is already bookmarked.
pub async fn add_post_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateBookmark>,
) -> AppResult<(StatusCode, Json<DataResponse<PostBookmark>>)> {
    let bookmark = BookmarkRepo::add_post(&state.pool, user.user_id, input.post_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: bookmark })))
}

/// DELETE /api/v1/bookmarks/{post_id}
pub async fn remove_post_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(post_id): Path<DbId>,
) -> AppResult<StatusCode> {
    BookmarkRepo::remove_post(&state.pool, user.user_id, post_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/products/{id}/bookmarks
pub async fn add_product_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<ProductBookmark>>)> {
    let bookmark = BookmarkRepo::add_product(&state.pool, user.user_id, product_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: bookmark })))
}

/// DELETE /api/v1/products/{id}/bookmarks
pub async fn remove_product_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<DbId>,
) -> AppResult<StatusCode> {
    BookmarkRepo::remove_product(&state.pool, user.user_id, product_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
