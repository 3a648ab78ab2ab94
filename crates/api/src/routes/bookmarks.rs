use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::bookmarks;
use crate::state::AppState;

/// Post bookmark routes mounted at `/bookmarks`. Product bookmarks live under
/// `/products/{id}/bookmarks`.
///
/// ```text
/// GET    /            -> list_my_bookmarks
/// POST   /            -> add_post_bookmark
/// DELETE /{post_id}   -> remove_post_bookmark
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookmarks::list_my_bookmarks).post(bookmarks::add_post_bookmark),
        )
        .route("/{post_id}", delete(bookmarks::remove_post_bookmark))
}
