use axum::routing::get;
use axum::Router;

use crate::handlers::posts;
use crate::state::AppState;

/// Routes mounted at `/posts`.
///
/// ```text
/// GET    /                -> list_posts
/// POST   /                -> create_post
/// GET    /{id}            -> get_post
/// PUT    /{id}            -> update_post
/// DELETE /{id}            -> delete_post
/// GET    /{id}/comments   -> list_post_comments
/// POST   /{id}/comments   -> create_post_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(posts::list_posts).post(posts::create_post))
        .route(
            "/{id}",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/{id}/comments",
            get(posts::list_post_comments).post(posts::create_post_comment),
        )
}
