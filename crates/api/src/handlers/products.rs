//! Handlers for the `/products` resource and its prices.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use thrush_core::entity::PermissionBearing;
use thrush_core::error::CoreError;
use thrush_core::permissions::{actions, codename};
use thrush_core::types::DbId;
use thrush_db::models::price::{CreatePrice, Price};
use thrush_db::models::product::{CreateProduct, Product, ProductFilter};
use thrush_db::repositories::{PriceRepo, ProductRepo};

use crate::error::AppResult;
use crate::lifecycle::CreatedEntity;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/products
///
/// Filters: `kind` (`paper_book`, `ebook`, `audio_book`), `category_id`.
pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> AppResult<Json<DataResponse<Vec<Product>>>> {
    let products = ProductRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse { data: products }))
}

/// POST /api/v1/products
///
/// Requires `product.add`. The caller becomes the seller and receives the
/// object grants.
pub async fn create_product(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProduct>,
) -> AppResult<(StatusCode, Json<DataResponse<Product>>)> {
    user.require_permission(&state.pool, &codename(Product::MODEL_NAME, actions::ADD))
        .await?;

    let mut tx = state.pool.begin().await?;
    let product = ProductRepo::create(&mut *tx, user.user_id, &input).await?;
    state
        .lifecycle
        .commit_as(
            &state.pool,
            tx,
            CreatedEntity::of(&product).with_creator(user.user_id),
        )
        .await?;

    tracing::info!(user_id = user.user_id, product_id = product.id, kind = %product.kind, "Product created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: product })))
}

/// GET /api/v1/products/{id}
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Product>>> {
    let product = ensure_product_exists(&state, id).await?;
    Ok(Json(DataResponse { data: product }))
}

/// DELETE /api/v1/products/{id}
pub async fn delete_product(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_product_exists(&state, id).await?;
    user.require_object_permission::<Product>(&state.pool, actions::DELETE, id)
        .await?;

    if ProductRepo::soft_delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(CoreError::NotFound {
            entity: "product",
            id,
        }
        .into())
    }
}

/// GET /api/v1/products/{id}/prices
pub async fn list_prices(
    State(state): State<AppState>,
    Path(product_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Price>>>> {
    ensure_product_exists(&state, product_id).await?;
    let prices = PriceRepo::list_for_product(&state.pool, product_id).await?;
    Ok(Json(DataResponse { data: prices }))
}

/// POST /api/v1/products/{id}/prices
///
/// Requires `price.add`.
pub async fn create_price(
    State(state): State<AppState>,
    user: AuthUser,
    Path(product_id): Path<DbId>,
    Json(input): Json<CreatePrice>,
) -> AppResult<(StatusCode, Json<DataResponse<Price>>)> {
    user.require_permission(&state.pool, &codename(Price::MODEL_NAME, actions::ADD))
        .await?;

    let mut tx = state.pool.begin().await?;
    let price = PriceRepo::create(&mut *tx, product_id, &input).await?;
    state.lifecycle.commit_created(&state.pool, tx, &price).await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: price })))
}

async fn ensure_product_exists(state: &AppState, id: DbId) -> AppResult<Product> {
    ProductRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            CoreError::NotFound {
                entity: "product",
                id,
            }
            .into()
        })
}
