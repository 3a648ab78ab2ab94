//! Repository for cross-table trash operations.
//!
//! Provides a unified view of soft-deleted rows across every soft-deletable
//! table, plus single-item restore. `updated_at` of a deleted row records
//! when it was deleted, since deletion is its last write.

use serde::Serialize;
use sqlx::PgPool;
use thrush_core::types::{DbId, Timestamp};

use crate::models::address::Address;
use crate::models::category::Category;
use crate::models::comment::Comment;
use crate::models::post::Post;
use crate::models::price::Price;
use crate::models::product::Product;
use crate::models::slide::Slide;
use crate::models::tag::Tag;
use crate::soft_delete;

/// Known entity types that support soft-delete.
const KNOWN_ENTITY_TYPES: &[&str] = &[
    "categories",
    "tags",
    "posts",
    "comments",
    "slides",
    "products",
    "prices",
    "addresses",
];

/// A single soft-deleted item surfaced in the trash list.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TrashedItem {
    pub id: DbId,
    pub entity_type: String,
    pub name_or_label: Option<String>,
    pub deleted_at: Timestamp,
}

/// Returns `true` if `entity_type` is one of the known types.
pub fn is_known_entity_type(entity_type: &str) -> bool {
    KNOWN_ENTITY_TYPES.contains(&entity_type)
}

/// Provides cross-table trash operations.
pub struct TrashRepo;

impl TrashRepo {
    /// List soft-deleted items, most recently deleted first.
    ///
    /// When `entity_type` is `Some`, only that table is queried. Unknown
    /// types yield an empty list.
    pub async fn list_trashed(
        pool: &PgPool,
        entity_type: Option<&str>,
    ) -> Result<Vec<TrashedItem>, sqlx::Error> {
        let types: Vec<&str> = match entity_type {
            Some(et) if is_known_entity_type(et) => vec![et],
            Some(_) => return Ok(Vec::new()),
            None => KNOWN_ENTITY_TYPES.to_vec(),
        };

        let unions: Vec<String> = types
            .iter()
            .map(|et| {
                let name_expr = name_expr(et);
                format!(
                    "SELECT id, '{et}' AS entity_type, {name_expr} AS name_or_label, \
                     updated_at AS deleted_at FROM {et} WHERE is_deleted = TRUE"
                )
            })
            .collect();
        let sql = format!("{} ORDER BY deleted_at DESC, id DESC", unions.join(" UNION ALL "));
        sqlx::query_as::<_, TrashedItem>(&sql).fetch_all(pool).await
    }

    /// Restore one soft-deleted row. Returns `false` if it was not in the trash.
    pub async fn restore(pool: &PgPool, entity_type: &str, id: DbId) -> Result<bool, sqlx::Error> {
        match entity_type {
            "categories" => soft_delete::restore::<Category, _>(pool, id).await,
            "tags" => soft_delete::restore::<Tag, _>(pool, id).await,
            "posts" => soft_delete::restore::<Post, _>(pool, id).await,
            "comments" => soft_delete::restore::<Comment, _>(pool, id).await,
            "slides" => soft_delete::restore::<Slide, _>(pool, id).await,
            "products" => soft_delete::restore::<Product, _>(pool, id).await,
            "prices" => soft_delete::restore::<Price, _>(pool, id).await,
            "addresses" => soft_delete::restore::<Address, _>(pool, id).await,
            _ => Ok(false),
        }
    }
}

/// Expression used as the human-readable label of a trashed row.
fn name_expr(entity_type: &str) -> &'static str {
    match entity_type {
        "posts" | "slides" => "title",
        "comments" => "message",
        "prices" => "amount::TEXT",
        _ => "name",
    }
}
