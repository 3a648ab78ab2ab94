//! Handlers for the `/tags` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use thrush_core::entity::PermissionBearing;
use thrush_core::error::CoreError;
use thrush_core::permissions::{actions, codename};
use thrush_db::models::tag::{CreateTag, Tag, TagFilter};
use thrush_db::repositories::TagRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
pub async fn list_tags(
    State(state): State<AppState>,
    Query(filter): Query<TagFilter>,
) -> AppResult<Json<DataResponse<Vec<Tag>>>> {
    let tags = TagRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: tags }))
}

/// POST /api/v1/tags
pub async fn create_tag(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateTag>,
) -> AppResult<(StatusCode, Json<DataResponse<Tag>>)> {
    user.require_permission(&state.pool, &codename(Tag::MODEL_NAME, actions::ADD))
        .await?;

    if input.name.trim().is_empty() {
        return Err(CoreError::Validation("Tag name must not be empty".into()).into());
    }

    let mut tx = state.pool.begin().await?;
    let tag = TagRepo::create(&mut *tx, &input).await?;
    state.lifecycle.commit_created(&state.pool, tx, &tag).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: tag })))
}

/// GET /api/v1/tags/{id_or_name}
///
/// Numeric keys are tried as an id first, then as a name.
pub async fn get_tag(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<Tag>>> {
    let tag = TagRepo::find_by_id_or_name(&state.pool, &key)
        .await?
        .ok_or(CoreError::NotFoundByKey { entity: "tag", key })?;
    Ok(Json(DataResponse { data: tag }))
}
