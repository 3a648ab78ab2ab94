//! Handler for `POST /stars`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use thrush_core::entity::PermissionBearing;
use thrush_core::permissions::{actions, codename};
use thrush_core::rating::SubmitOutcome;
use thrush_db::models::star::{Star, SubmitStar};
use thrush_db::repositories::StarRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/stars
///
/// Creates the caller's star on a post (201) or replaces its value (200).
/// Only a newly created star runs the on-create hooks.
pub async fn submit_star(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SubmitStar>,
) -> AppResult<(StatusCode, Json<DataResponse<Star>>)> {
    user.require_permission(&state.pool, &codename(Star::MODEL_NAME, actions::ADD))
        .await?;
    let bounds = state.config.lifecycle.star_bounds;

    let mut tx = state.pool.begin().await?;
    let outcome = StarRepo::submit(&mut *tx, bounds, user.user_id, input.post_id, input.value).await?;

    let (status, star) = match outcome {
        SubmitOutcome::Created(star) => {
            state.lifecycle.commit_created(&state.pool, tx, &star).await?;
            (StatusCode::CREATED, star)
        }
        SubmitOutcome::Updated(star) => {
            tx.commit().await?;
            (StatusCode::OK, star)
        }
    };

    tracing::debug!(
        user_id = user.user_id,
        post_id = star.post_id,
        value = star.value,
        created = status == StatusCode::CREATED,
        "Star submitted",
    );
    Ok((status, Json(DataResponse { data: star })))
}
