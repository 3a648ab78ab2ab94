//! Address entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `addresses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Address {
    pub id: DbId,
    pub user_id: DbId,
    pub name: String,
    pub country: String,
    pub city: String,
    pub state: String,
    pub post_code: String,
    pub address: String,
    pub street: Option<String>,
    pub house_number: String,
    pub floor: String,
    pub unit: String,
    pub is_default: bool,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Address);
thrush_core::impl_soft_deletable!(Address, "addresses");

impl PermissionBearing for Address {
    const MODEL_NAME: &'static str = "address";

    fn creator_id(&self) -> Option<DbId> {
        Some(self.user_id)
    }
}

/// DTO for creating an address. The owner comes from the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreateAddress {
    pub name: Option<String>,
    pub country: String,
    pub city: String,
    pub state: String,
    pub post_code: String,
    pub address: String,
    pub street: Option<String>,
    pub house_number: String,
    pub floor: String,
    pub unit: String,
    /// Defaults to `true`; a new default replaces the previous one.
    pub is_default: Option<bool>,
}
