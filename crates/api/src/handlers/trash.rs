//! Handlers for the `/admin/trash` resource.
//!
//! Lists soft-deleted rows across every soft-deletable table and restores
//! them. Superusers only.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use thrush_core::error::CoreError;
use thrush_core::types::DbId;
use thrush_db::repositories::trash_repo::{is_known_entity_type, TrashRepo, TrashedItem};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireSuperuser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TrashQuery {
    /// Optional entity type filter (e.g. "posts", "categories").
    #[serde(rename = "type")]
    pub entity_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub restored: bool,
    pub entity_type: String,
    pub id: DbId,
}

/// GET /api/v1/admin/trash
pub async fn list_trashed(
    RequireSuperuser(_admin): RequireSuperuser,
    State(state): State<AppState>,
    Query(params): Query<TrashQuery>,
) -> AppResult<Json<DataResponse<Vec<TrashedItem>>>> {
    if let Some(ref et) = params.entity_type {
        validate_entity_type(et)?;
    }
    let items = TrashRepo::list_trashed(&state.pool, params.entity_type.as_deref()).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/admin/trash/{entity_type}/{id}/restore
///
/// 404 if the row is not in the trash. 409 if restoring it would collide with
/// a visible row on a unique key.
pub async fn restore(
    RequireSuperuser(admin): RequireSuperuser,
    State(state): State<AppState>,
    Path((entity_type, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<RestoreResponse>>> {
    validate_entity_type(&entity_type)?;

    if !TrashRepo::restore(&state.pool, &entity_type, id).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "trashed item",
            id,
        }));
    }

    tracing::info!(user_id = admin.user_id, entity_type = %entity_type, id, "Restored from trash");
    Ok(Json(DataResponse {
        data: RestoreResponse {
            restored: true,
            entity_type,
            id,
        },
    }))
}

fn validate_entity_type(entity_type: &str) -> AppResult<()> {
    if is_known_entity_type(entity_type) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Unknown entity type: {entity_type}"
        )))
    }
}
