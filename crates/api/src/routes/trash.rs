use axum::routing::{get, post};
use axum::Router;

use crate::handlers::trash;
use crate::state::AppState;

/// Routes mounted at `/admin/trash`. Superuser only.
///
/// ```text
/// GET  /                            -> list_trashed (?type=)
/// POST /{entity_type}/{id}/restore  -> restore
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trash::list_trashed))
        .route("/{entity_type}/{id}/restore", post(trash::restore))
}
