use axum::routing::{get, post};
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Routes mounted at `/categories`.
///
/// ```text
/// GET    /             -> list_categories
/// POST   /             -> create_category
/// GET    /{id}         -> get_category
/// PUT    /{id}         -> update_category
/// DELETE /{id}         -> delete_category
/// POST   /{id}/posts   -> create_category_post
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(categories::list_categories).post(categories::create_category),
        )
        .route(
            "/{id}",
            get(categories::get_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
        .route("/{id}/posts", post(categories::create_category_post))
}
