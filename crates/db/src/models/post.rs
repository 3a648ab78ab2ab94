//! Post entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

use super::tag::Tag;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub user_id: DbId,
    pub category_id: DbId,
    pub title: String,
    pub brief: String,
    pub content: String,
    pub slug: String,
    pub image: Option<String>,
    pub is_draft: bool,
    pub previous_id: Option<DbId>,
    pub visited: i64,
    pub is_approved: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Post);
thrush_core::impl_soft_deletable!(Post, "posts");

impl PermissionBearing for Post {
    const MODEL_NAME: &'static str = "post";

    fn creator_id(&self) -> Option<DbId> {
        Some(self.user_id)
    }
}

/// A post row plus its aggregate counters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostWithStats {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub post: Post,
    /// Visible, approved comments.
    pub comments_count: i64,
    /// Mean star value, `0.0` when the post has no stars.
    pub stars_average: f64,
    pub bookmarks_count: i64,
}

/// Read model returned by the post endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostWithStats,
    pub tags: Vec<Tag>,
}

/// DTO for creating a new post. The author comes from the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub brief: String,
    pub content: String,
    pub slug: String,
    pub image: Option<String>,
    pub is_draft: Option<bool>,
    pub previous_id: Option<DbId>,
    /// Ignored when the post is created under `/categories/{id}/posts`.
    pub category_id: Option<DbId>,
    #[serde(default)]
    pub tag_ids: Vec<DbId>,
}

/// DTO for updating an existing post. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub brief: Option<String>,
    pub content: Option<String>,
    pub slug: Option<String>,
    pub image: Option<String>,
    pub is_draft: Option<bool>,
    pub category_id: Option<DbId>,
    /// When present, replaces the post's tag set.
    pub tag_ids: Option<Vec<DbId>>,
}

/// Query-string filter for post listing.
#[derive(Debug, Default, Deserialize)]
pub struct PostFilter {
    pub title: Option<String>,
    pub slug: Option<String>,
    /// Tag name.
    pub tag: Option<String>,
    pub is_draft: Option<bool>,
    pub category_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
