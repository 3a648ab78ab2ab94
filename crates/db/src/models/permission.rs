//! Groups and permission codenames.

use serde::Serialize;
use sqlx::FromRow;
use thrush_core::types::{DbId, Timestamp};

/// A row from the `groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Group {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// A row from the `permissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Permission {
    pub id: DbId,
    /// `"{model}.{action}"`, e.g. `"post.change"`.
    pub codename: String,
    pub name: String,
    pub created_at: Timestamp,
}

/// An object-level grant as read back from either grant table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ObjectGrant {
    pub codename: String,
    pub model_name: String,
    pub object_id: DbId,
}
