pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod lifecycle;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
