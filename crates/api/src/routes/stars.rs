use axum::routing::post;
use axum::Router;

use crate::handlers::stars;
use crate::state::AppState;

/// Routes mounted at `/stars`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(stars::submit_star))
}
