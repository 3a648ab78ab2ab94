pub mod addresses;
pub mod auth;
pub mod bookmarks;
pub mod categories;
pub mod comments;
pub mod posts;
pub mod products;
pub mod slides;
pub mod stars;
pub mod tags;
pub mod trash;
