use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::addresses;
use crate::state::AppState;

/// Routes mounted at `/addresses`. All require auth.
///
/// ```text
/// GET    /       -> list_addresses
/// POST   /       -> create_address
/// DELETE /{id}   -> delete_address
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(addresses::list_addresses).post(addresses::create_address),
        )
        .route("/{id}", delete(addresses::delete_address))
}
