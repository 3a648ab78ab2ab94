//! Comment entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

/// Longest accepted comment message, in characters.
pub const MAX_MESSAGE_LEN: usize = 500;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub user_id: DbId,
    pub post_id: DbId,
    pub message: String,
    pub reply_to_id: Option<DbId>,
    pub is_approved: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Comment);
thrush_core::impl_soft_deletable!(Comment, "comments");

impl PermissionBearing for Comment {
    const MODEL_NAME: &'static str = "comment";

    fn creator_id(&self) -> Option<DbId> {
        Some(self.user_id)
    }
}

/// DTO for creating a comment on a post.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub message: String,
    pub reply_to_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateComment {
    pub message: Option<String>,
}
