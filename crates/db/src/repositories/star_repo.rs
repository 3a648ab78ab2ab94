//! Repository for the `stars` table.
//!
//! A user holds at most one star per post. Submitting again replaces the
//! value; the caller learns whether the row was created or updated.

use sqlx::{FromRow, PgConnection, PgPool};
use thrush_core::error::CoreError;
use thrush_core::rating::{StarBounds, SubmitOutcome};
use thrush_core::types::DbId;

use crate::error::RepoResult;
use crate::models::post::Post;
use crate::models::star::Star;
use crate::soft_delete;

const COLUMNS: &str = "id, user_id, post_id, value, created_at, updated_at";

#[derive(FromRow)]
struct UpsertRow {
    #[sqlx(flatten)]
    star: Star,
    inserted: bool,
}

/// Provides the star edge guard.
pub struct StarRepo;

impl StarRepo {
    /// Create or update the caller's star on a visible post.
    ///
    /// The value is checked against `bounds` before anything is written. The
    /// upsert reports insert vs update from the row's `xmax`, so the outcome
    /// stays exact when two submissions race.
    pub async fn submit(
        conn: &mut PgConnection,
        bounds: StarBounds,
        user_id: DbId,
        post_id: DbId,
        value: i64,
    ) -> RepoResult<SubmitOutcome<Star>> {
        let value = bounds.validate(value)?;

        if !soft_delete::is_visible::<Post, _>(&mut *conn, post_id).await? {
            return Err(CoreError::NotFound {
                entity: "post",
                id: post_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO stars (user_id, post_id, value) VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_stars_user_post
             DO UPDATE SET value = EXCLUDED.value
             RETURNING {COLUMNS}, (xmax = 0) AS inserted"
        );
        let row = sqlx::query_as::<_, UpsertRow>(&query)
            .bind(user_id)
            .bind(post_id)
            .bind(value)
            .fetch_one(conn)
            .await?;

        Ok(if row.inserted {
            SubmitOutcome::Created(row.star)
        } else {
            SubmitOutcome::Updated(row.star)
        })
    }

    /// The star a user gave a post, if any.
    pub async fn find_for_user_post(
        pool: &PgPool,
        user_id: DbId,
        post_id: DbId,
    ) -> Result<Option<Star>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stars WHERE user_id = $1 AND post_id = $2");
        sqlx::query_as::<_, Star>(&query)
            .bind(user_id)
            .bind(post_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn count_for_post(pool: &PgPool, post_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM stars WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(pool)
            .await
    }
}
