use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`. All public.
///
/// ```text
/// POST /register  -> register
/// POST /login     -> login
/// POST /verify    -> verify
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify", post(auth::verify))
}
