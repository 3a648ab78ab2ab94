//! Star (rating) entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `stars` table. One per `(user_id, post_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Star {
    pub id: DbId,
    pub user_id: DbId,
    pub post_id: DbId,
    pub value: i16,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Star);

impl PermissionBearing for Star {
    const MODEL_NAME: &'static str = "star";

    fn creator_id(&self) -> Option<DbId> {
        Some(self.user_id)
    }
}

/// Request body for submitting a star. The value is range-checked before any write.
#[derive(Debug, Deserialize)]
pub struct SubmitStar {
    pub post_id: DbId,
    pub value: i64,
}
