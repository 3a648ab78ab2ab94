use axum::routing::{post, put};
use axum::Router;

use crate::handlers::comments;
use crate::state::AppState;

/// Routes mounted at `/comments`.
///
/// ```text
/// PUT    /{id}          -> update_comment
/// DELETE /{id}          -> delete_comment
/// POST   /{id}/approve  -> approve_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            put(comments::update_comment).delete(comments::delete_comment),
        )
        .route("/{id}/approve", post(comments::approve_comment))
}
