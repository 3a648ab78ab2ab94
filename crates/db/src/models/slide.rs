//! Slide entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thrush_core::entity::PermissionBearing;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `slides` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Slide {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub link: Option<String>,
    pub is_draft: bool,
    pub sort_order: i32,
    pub is_approved: bool,
    pub start_time: Timestamp,
    pub expire_time: Option<Timestamp>,
    pub is_deleted: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

thrush_core::impl_timestamped_entity!(Slide);
thrush_core::impl_soft_deletable!(Slide, "slides");

impl PermissionBearing for Slide {
    const MODEL_NAME: &'static str = "slide";
}

#[derive(Debug, Deserialize)]
pub struct CreateSlide {
    pub title: String,
    pub content: String,
    pub image: Option<String>,
    pub link: Option<String>,
    pub is_draft: Option<bool>,
    pub sort_order: i32,
    pub start_time: Option<Timestamp>,
    pub expire_time: Option<Timestamp>,
}
