use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{bookmarks, products};
use crate::state::AppState;

/// Routes mounted at `/products`.
///
/// ```text
/// GET    /                 -> list_products
/// POST   /                 -> create_product
/// GET    /{id}             -> get_product
/// DELETE /{id}             -> delete_product
/// GET    /{id}/prices      -> list_prices
/// POST   /{id}/prices      -> create_price
/// POST   /{id}/bookmarks   -> add_product_bookmark
/// DELETE /{id}/bookmarks   -> remove_product_bookmark
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/{id}",
            get(products::get_product).delete(products::delete_product),
        )
        .route(
            "/{id}/prices",
            get(products::list_prices).post(products::create_price),
        )
        .route(
            "/{id}/bookmarks",
            post(bookmarks::add_product_bookmark).delete(bookmarks::remove_product_bookmark),
        )
}
