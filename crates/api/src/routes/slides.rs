use axum::routing::get;
use axum::Router;

use crate::handlers::slides;
use crate::state::AppState;

/// Routes mounted at `/slides`.
///
/// ```text
/// GET    /       -> list_slides
/// POST   /       -> create_slide
/// GET    /{key}  -> get_slide (id or title)
/// DELETE /{key}  -> delete_slide (id)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(slides::list_slides).post(slides::create_slide))
        .route("/{key}", get(slides::get_slide).delete(slides::delete_slide))
}
