//! Price entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `prices` table. A product may carry several dated prices.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Price {
    pub id: DbId,
    pub product_id: DbId,
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// Percentage, 0 to 100.
    pub discount: i16,
    pub starts_at: Timestamp,
    pub ends_at: Option<Timestamp>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Price);
thrush_core::impl_soft_deletable!(Price, "prices");

impl PermissionBearing for Price {
    const MODEL_NAME: &'static str = "price";
}

#[derive(Debug, Deserialize)]
pub struct CreatePrice {
    pub amount: i64,
    pub discount: Option<i16>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}
