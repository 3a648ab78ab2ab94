//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub name: String,
    pub parent_id: Option<DbId>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Category);
thrush_core::impl_soft_deletable!(Category, "categories");

impl PermissionBearing for Category {
    const MODEL_NAME: &'static str = "category";
}

/// DTO for creating a new category.
#[derive(Debug, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub parent_id: Option<DbId>,
}

/// DTO for updating an existing category. All fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub parent_id: Option<DbId>,
}

/// Filter for category listing.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryFilter {
    pub name: Option<String>,
}
