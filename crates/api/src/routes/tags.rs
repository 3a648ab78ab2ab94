use axum::routing::get;
use axum::Router;

use crate::handlers::tags;
use crate::state::AppState;

/// Routes mounted at `/tags`.
///
/// ```text
/// GET  /              -> list_tags
/// POST /              -> create_tag
/// GET  /{id_or_name}  -> get_tag
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tags::list_tags).post(tags::create_tag))
        .route("/{id_or_name}", get(tags::get_tag))
}
