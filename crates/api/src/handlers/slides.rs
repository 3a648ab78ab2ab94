//! Handlers for the `/slides` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use thrush_core::entity::PermissionBearing;
use thrush_core::error::CoreError;
use thrush_core::permissions::{actions, codename};
use thrush_core::types::DbId;
use thrush_db::models::slide::{CreateSlide, Slide};
use thrush_db::repositories::SlideRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/slides
///
/// Visible slides by `sort_order`.
pub async fn list_slides(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Slide>>>> {
    let slides = SlideRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: slides }))
}

/// GET /api/v1/slides/{id_or_title}
pub async fn get_slide(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<DataResponse<Slide>>> {
    let slide = SlideRepo::find_by_id_or_title(&state.pool, &key)
        .await?
        .ok_or(CoreError::NotFoundByKey {
            entity: "slide",
            key,
        })?;
    Ok(Json(DataResponse { data: slide }))
}

/// POST /api/v1/slides
///
/// Requires `slide.add`.
pub async fn create_slide(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateSlide>,
) -> AppResult<(StatusCode, Json<DataResponse<Slide>>)> {
    user.require_permission(&state.pool, &codename(Slide::MODEL_NAME, actions::ADD))
        .await?;

    if input.title.trim().is_empty() {
        return Err(CoreError::Validation("Slide title must not be empty".into()).into());
    }
    if let (Some(start), Some(expire)) = (input.start_time, input.expire_time) {
        if expire <= start {
            return Err(
                CoreError::Validation("expire_time must be after start_time".into()).into(),
            );
        }
    }

    let mut tx = state.pool.begin().await?;
    let slide = SlideRepo::create(&mut *tx, &input).await?;
    state.lifecycle.commit_created(&state.pool, tx, &slide).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: slide })))
}

/// DELETE /api/v1/slides/{id}
pub async fn delete_slide(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    SlideRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound { entity: "slide", id })?;
    user.require_object_permission::<Slide>(&state.pool, actions::DELETE, id)
        .await?;

    if SlideRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound { entity: "slide", id }.into())
    }
}
