//! Repository for the `tags` table.

use sqlx::{PgConnection, PgPool};
use thrush_core::types::DbId;

use crate::models::tag::{CreateTag, Tag, TagFilter};

const COLUMNS: &str = "id, name, is_deleted, created_at, updated_at";

/// Provides CRUD operations for tags.
pub struct TagRepo;

impl TagRepo {
    pub async fn create(conn: &mut PgConnection, input: &CreateTag) -> Result<Tag, sqlx::Error> {
        let query = format!("INSERT INTO tags (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Tag>(&query)
            .bind(&input.name)
            .fetch_one(conn)
            .await
    }

    /// Find a visible tag by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Tag>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a visible tag by exact name.
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Tag>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tags WHERE name = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Tag>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a path key that is either a numeric ID or a tag name.
    ///
    /// Numeric keys are tried as IDs first, then as names, so a tag literally
    /// named `"42"` stays reachable.
    pub async fn find_by_id_or_name(pool: &PgPool, key: &str) -> Result<Option<Tag>, sqlx::Error> {
        if let Ok(id) = key.parse::<DbId>() {
            if let Some(tag) = Self::find_by_id(pool, id).await? {
                return Ok(Some(tag));
            }
        }
        Self::find_by_name(pool, key).await
    }

    /// List visible tags, oldest first.
    pub async fn list(pool: &PgPool, filter: &TagFilter) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags
             WHERE is_deleted = FALSE AND ($1::TEXT IS NULL OR name = $1)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(&filter.name)
            .fetch_all(pool)
            .await
    }

    /// Visible tags attached to a post.
    pub async fn list_for_post(pool: &PgPool, post_id: DbId) -> Result<Vec<Tag>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.is_deleted, t.created_at, t.updated_at
             FROM tags t
             JOIN post_tags pt ON pt.tag_id = t.id
             WHERE pt.post_id = $1 AND t.is_deleted = FALSE
             ORDER BY t.name",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }
}
