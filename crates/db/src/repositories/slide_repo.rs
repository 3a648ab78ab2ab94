//! Repository for the `slides` table.

use sqlx::{PgConnection, PgPool};
use thrush_core::types::DbId;

use crate::models::slide::{CreateSlide, Slide};
use crate::soft_delete;

const COLUMNS: &str = "id, title, content, image, link, is_draft, sort_order, is_approved, \
                        start_time, expire_time, is_deleted, created_at, updated_at";

/// Provides CRUD operations for slides. Listing follows `sort_order`.
pub struct SlideRepo;

impl SlideRepo {
    pub async fn create(conn: &mut PgConnection, input: &CreateSlide) -> Result<Slide, sqlx::Error> {
        let query = format!(
            "INSERT INTO slides
                (title, content, image, link, is_draft, sort_order, start_time, expire_time)
             VALUES ($1, $2, $3, $4, COALESCE($5, FALSE), $6, COALESCE($7, NOW()), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Slide>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image)
            .bind(&input.link)
            .bind(input.is_draft)
            .bind(input.sort_order)
            .bind(input.start_time)
            .bind(input.expire_time)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Slide>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slides WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Slide>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_title(pool: &PgPool, title: &str) -> Result<Option<Slide>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM slides WHERE title = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Slide>(&query)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// Resolve a path key that is either a numeric ID or a slide title.
    pub async fn find_by_id_or_title(
        pool: &PgPool,
        key: &str,
    ) -> Result<Option<Slide>, sqlx::Error> {
        if let Ok(id) = key.parse::<DbId>() {
            if let Some(slide) = Self::find_by_id(pool, id).await? {
                return Ok(Some(slide));
            }
        }
        Self::find_by_title(pool, key).await
    }

    /// List visible slides by `sort_order`.
    pub async fn list(pool: &PgPool) -> Result<Vec<Slide>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM slides WHERE is_deleted = FALSE ORDER BY sort_order ASC"
        );
        sqlx::query_as::<_, Slide>(&query).fetch_all(pool).await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete::<Slide, _>(pool, id).await
    }
}
