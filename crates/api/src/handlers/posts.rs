//! Handlers for the `/posts` resource and its comments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use thrush_core::entity::PermissionBearing;
use thrush_core::error::CoreError;
use thrush_core::permissions::{actions, codename};
use thrush_core::types::DbId;
use thrush_db::models::comment::{Comment, CreateComment};
use thrush_db::models::post::{CreatePost, Post, PostDetail, PostFilter, UpdatePost};
use thrush_db::repositories::{CommentRepo, PostRepo};

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, OptionalAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/posts
///
/// Filters: `title`, `slug`, `tag` (name), `is_draft`, `category_id`,
/// `limit`, `offset`.
pub async fn list_posts(
    State(state): State<AppState>,
    Query(filter): Query<PostFilter>,
) -> AppResult<Json<DataResponse<Vec<PostDetail>>>> {
    let posts = PostRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: posts }))
}

/// POST /api/v1/posts
pub async fn create_post(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<DataResponse<Post>>)> {
    let category_id = input
        .category_id
        .ok_or_else(|| CoreError::Validation("category_id is required".into()))?;
    let post = create_post_in(&state, &user, category_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

/// GET /api/v1/posts/{id}
///
/// Counts the read towards the post's `visited` counter.
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<PostDetail>>> {
    PostRepo::increment_visited(&state.pool, id).await?;
    let post = PostRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "post", id })?;
    Ok(Json(DataResponse { data: post }))
}

/// PUT /api/v1/posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePost>,
) -> AppResult<Json<DataResponse<Post>>> {
    ensure_post_exists(&state, id).await?;
    user.require_object_permission::<Post>(&state.pool, actions::CHANGE, id)
        .await?;

    if let Some(ref title) = input.title {
        validate_title(title)?;
    }

    let post = PostRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound { entity: "post", id })?;
    Ok(Json(DataResponse { data: post }))
}

/// DELETE /api/v1/posts/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_post_exists(&state, id).await?;
    user.require_object_permission::<Post>(&state.pool, actions::DELETE, id)
        .await?;

    if PostRepo::soft_delete(&state.pool, id).await? {
        tracing::info!(user_id = user.user_id, post_id = id, "Post deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound { entity: "post", id }.into())
    }
}

/// GET /api/v1/posts/{id}/comments
///
/// Unapproved comments are only listed for callers holding `comment.approve`.
pub async fn list_post_comments(
    State(state): State<AppState>,
    OptionalAuthUser(user): OptionalAuthUser,
    Path(post_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Comment>>>> {
    ensure_post_exists(&state, post_id).await?;

    let include_unapproved = match user {
        Some(ref user) => {
            user.has_permission(&state.pool, &codename(Comment::MODEL_NAME, actions::APPROVE))
                .await?
        }
        None => false,
    };

    let comments = CommentRepo::list_for_post(&state.pool, post_id, include_unapproved).await?;
    Ok(Json(DataResponse { data: comments }))
}

/// POST /api/v1/posts/{id}/comments
pub async fn create_post_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(post_id): Path<DbId>,
    Json(input): Json<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<Comment>>)> {
    user.require_permission(&state.pool, &codename(Comment::MODEL_NAME, actions::ADD))
        .await?;

    let mut tx = state.pool.begin().await?;
    let comment = CommentRepo::create(&mut *tx, user.user_id, post_id, &input).await?;
    state
        .lifecycle
        .commit_created(&state.pool, tx, &comment)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// Insert a post authored by `user` in `category_id` and run the on-create
/// hooks.
pub(crate) async fn create_post_in(
    state: &AppState,
    user: &AuthUser,
    category_id: DbId,
    input: &CreatePost,
) -> AppResult<Post> {
    user.require_permission(&state.pool, &codename(Post::MODEL_NAME, actions::ADD))
        .await?;
    validate_title(&input.title)?;
    if input.slug.trim().is_empty() {
        return Err(CoreError::Validation("Post slug must not be empty".into()).into());
    }

    let mut tx = state.pool.begin().await?;
    let post = PostRepo::create(&mut *tx, user.user_id, category_id, input).await?;
    state.lifecycle.commit_created(&state.pool, tx, &post).await?;

    tracing::info!(user_id = user.user_id, post_id = post.id, category_id, "Post created");
    Ok(post)
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Post title must not be empty".into()).into());
    }
    Ok(())
}

async fn ensure_post_exists(state: &AppState, id: DbId) -> AppResult<Post> {
    PostRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::NotFound { entity: "post", id }.into())
}
