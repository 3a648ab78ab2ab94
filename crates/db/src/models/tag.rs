//! Tag entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub name: String,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Tag);
thrush_core::impl_soft_deletable!(Tag, "tags");

impl PermissionBearing for Tag {
    const MODEL_NAME: &'static str = "tag";
}

/// DTO for creating a new tag.
#[derive(Debug, Deserialize)]
pub struct CreateTag {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TagFilter {
    pub name: Option<String>,
}
