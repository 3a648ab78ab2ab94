//! Handlers for the `/comments` resource.
//!
//! Comments are created and listed under their post (see [`super::posts`]).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use thrush_core::error::CoreError;
use thrush_core::permissions::actions;
use thrush_core::types::DbId;
use thrush_db::models::comment::{Comment, UpdateComment};
use thrush_db::repositories::CommentRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// PUT /api/v1/comments/{id}
pub async fn update_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComment>,
) -> AppResult<Json<DataResponse<Comment>>> {
    ensure_comment_exists(&state, id).await?;
    user.require_object_permission::<Comment>(&state.pool, actions::CHANGE, id)
        .await?;

    let comment = CommentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "comment",
            id,
        })?;
    Ok(Json(DataResponse { data: comment }))
}

/// DELETE /api/v1/comments/{id}
pub async fn delete_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_comment_exists(&state, id).await?;
    user.require_object_permission::<Comment>(&state.pool, actions::DELETE, id)
        .await?;

    if CommentRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "comment",
            id,
        }
        .into())
    }
}

/// POST /api/v1/comments/{id}/approve
pub async fn approve_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Comment>>> {
    ensure_comment_exists(&state, id).await?;
    user.require_object_permission::<Comment>(&state.pool, actions::APPROVE, id)
        .await?;

    let comment = CommentRepo::approve(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "comment",
            id,
        })?;

    tracing::info!(user_id = user.user_id, comment_id = id, "Comment approved");
    Ok(Json(DataResponse { data: comment }))
}

async fn ensure_comment_exists(state: &AppState, id: DbId) -> AppResult<Comment> {
    CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "comment",
                id,
            }
            .into()
        })
}
