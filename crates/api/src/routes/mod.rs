pub mod addresses;
pub mod auth;
pub mod bookmarks;
pub mod categories;
pub mod comments;
pub mod health;
pub mod posts;
pub mod products;
pub mod slides;
pub mod stars;
pub mod tags;
pub mod trash;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   create account (public)
/// /auth/login                                      access token (public)
/// /auth/verify                                     redeem verification code (public)
///
/// /categories                                      list, create
/// /categories/{id}                                 get, update, delete
/// /categories/{id}/posts                           create post in category
///
/// /tags                                            list, create
/// /tags/{id_or_name}                               get
///
/// /posts                                           list, create
/// /posts/{id}                                      get, update, delete
/// /posts/{id}/comments                             list, create
///
/// /comments/{id}                                   update, delete
/// /comments/{id}/approve                           approve (POST)
///
/// /stars                                           submit or re-rate (POST)
///
/// /bookmarks                                       list mine, add
/// /bookmarks/{post_id}                             remove
///
/// /slides                                          list, create
/// /slides/{id_or_title}                            get, delete
///
/// /products                                        list, create
/// /products/{id}                                   get, delete
/// /products/{id}/prices                            list, create
/// /products/{id}/bookmarks                         add, remove
///
/// /addresses                                       list, create
/// /addresses/{id}                                  delete
///
/// /admin/trash                                     list soft-deleted rows (admin only)
/// /admin/trash/{entity_type}/{id}/restore          restore (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/categories", categories::router())
        .nest("/tags", tags::router())
        .nest("/posts", posts::router())
        .nest("/comments", comments::router())
        .nest("/stars", stars::router())
        .nest("/bookmarks", bookmarks::router())
        .nest("/slides", slides::router())
        .nest("/products", products::router())
        .nest("/addresses", addresses::router())
        .nest("/admin/trash", trash::router())
}
