//! Bookmark edges between users and posts or products.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `post_bookmarks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostBookmark {
    pub post_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// A row from the `product_bookmarks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductBookmark {
    pub product_id: DbId,
    pub user_id: DbId,
    pub created_at: Timestamp,
}

/// Request body for bookmarking a post.
#[derive(Debug, Deserialize)]
pub struct CreateBookmark {
    pub post_id: DbId,
}
