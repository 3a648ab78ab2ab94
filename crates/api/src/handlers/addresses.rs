//! Handlers for the `/addresses` resource.
//!
//! Addresses are private: callers see and delete only their own, superusers
//! see all.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use thrush_core::error::CoreError;
use thrush_core::entity::PermissionBearing;
use thrush_core::permissions::{actions, codename};
use thrush_core::types::DbId;
use thrush_db::models::address::{Address, CreateAddress};
use thrush_db::repositories::AddressRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/addresses
pub async fn list_addresses(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Address>>>> {
    let owner = (!user.is_superuser).then_some(user.user_id);
    let addresses = AddressRepo::list(&state.pool, owner).await?;
    Ok(Json(DataResponse { data: addresses }))
}

/// POST /api/v1/addresses
///
/// A new address is the default unless `is_default` is `false`.
pub async fn create_address(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateAddress>,
) -> AppResult<(StatusCode, Json<DataResponse<Address>>)> {
    user.require_permission(&state.pool, &codename(Address::MODEL_NAME, actions::ADD))
        .await?;

    let mut tx = state.pool.begin().await?;
    let address = AddressRepo::create(&mut *tx, user.user_id, &input).await?;
    state
        .lifecycle
        .commit_created(&state.pool, tx, &address)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: address })))
}

/// DELETE /api/v1/addresses/{id}
pub async fn delete_address(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let not_found = || CoreError::NotFound {
        entity: "address",
        id,
    };

    let address = AddressRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|a| user.is_superuser || a.user_id == user.user_id)
        .ok_or_else(not_found)?;
    user.require_object_permission::<Address>(&state.pool, actions::DELETE, address.id)
        .await?;

    if AddressRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found().into())
    }
}
