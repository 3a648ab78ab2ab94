//! Handlers for the `/categories` resource.
//!
//! Deleting a category hides it and moves its posts and products onto the
//! configured placeholder categories.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use thrush_core::error::CoreError;
use thrush_core::entity::PermissionBearing;
use thrush_core::permissions::{actions, codename};
use thrush_core::types::DbId;
use thrush_db::models::category::{Category, CategoryFilter, CreateCategory, UpdateCategory};
use thrush_db::models::post::{CreatePost, Post};
use thrush_db::repositories::CategoryRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(
    State(state): State<AppState>,
    Query(filter): Query<CategoryFilter>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let categories = CategoryRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    user.require_permission(&state.pool, &codename(Category::MODEL_NAME, actions::ADD))
        .await?;

    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Category name must not be empty".into()).into());
    }
    if let Some(parent_id) = input.parent_id {
        ensure_category_exists(&state, parent_id).await?;
    }

    let mut tx = state.pool.begin().await?;
    let category = CategoryRepo::create(&mut *tx, &input).await?;
    state
        .lifecycle
        .commit_created(&state.pool, tx, &category)
        .await?;

    tracing::info!(user_id = user.user_id, category_id = category.id, "Category created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Category>>> {
    let category = ensure_category_exists(&state, id).await?;
    Ok(Json(DataResponse { data: category }))
}

/// PUT /api/v1/categories/{id}
pub async fn update_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    ensure_category_exists(&state, id).await?;
    user.require_object_permission::<Category>(&state.pool, actions::CHANGE, id)
        .await?;

    if input.parent_id == Some(id) {
        return Err(CoreError::Validation("A category cannot be its own parent".into()).into());
    }
    if let Some(parent_id) = input.parent_id {
        ensure_category_exists(&state, parent_id).await?;
    }

    let category = CategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "category",
            id,
        })?;
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Soft-deletes the category and redirects its dependents to placeholders.
pub async fn delete_category(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_category_exists(&state, id).await?;
    user.require_object_permission::<Category>(&state.pool, actions::DELETE, id)
        .await?;

    let rules = &state.config.lifecycle.placeholder_rules;
    if CategoryRepo::soft_delete_with_redirect(&state.pool, id, rules).await? {
        tracing::info!(user_id = user.user_id, category_id = id, "Category deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "category",
            id,
        }
        .into())
    }
}

/// POST /api/v1/categories/{id}/posts
///
/// Create a post bound to the category in the path; any `category_id` in the
/// body is ignored.
pub async fn create_category_post(
    State(state): State<AppState>,
    user: AuthUser,
    Path(category_id): Path<DbId>,
    Json(input): Json<CreatePost>,
) -> AppResult<(StatusCode, Json<DataResponse<Post>>)> {
    let post = super::posts::create_post_in(&state, &user, category_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: post })))
}

async fn ensure_category_exists(state: &AppState, id: DbId) -> AppResult<Category> {
    CategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "category",
                id,
            }
            .into()
        })
}
