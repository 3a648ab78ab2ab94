//! Generic soft-delete operations over any [`SoftDeletable`] entity.
//!
//! Deleting flips `is_deleted`; the `updated_at` trigger records when. Rows
//! are never removed, so foreign keys pointing at them stay valid.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor};
use thrush_core::entity::SoftDeletable;
use thrush_core::types::DbId;

/// Mark a visible row as deleted.
///
/// Returns `false` when the row does not exist or is already deleted, so a
/// repeated delete is a no-op.
pub async fn soft_delete<'e, T, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
where
    T: SoftDeletable,
    E: PgExecutor<'e>,
{
    let query = format!(
        "UPDATE {} SET is_deleted = TRUE WHERE id = $1 AND is_deleted = FALSE",
        T::TABLE
    );
    let result = sqlx::query(&query).bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

/// Clear the deleted flag. Returns `true` if a row was restored.
pub async fn restore<'e, T, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
where
    T: SoftDeletable,
    E: PgExecutor<'e>,
{
    let query = format!(
        "UPDATE {} SET is_deleted = FALSE WHERE id = $1 AND is_deleted = TRUE",
        T::TABLE
    );
    let result = sqlx::query(&query).bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

/// Whether a row exists and is not deleted.
pub async fn is_visible<'e, T, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
where
    T: SoftDeletable,
    E: PgExecutor<'e>,
{
    let query = format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND is_deleted = FALSE)",
        T::TABLE
    );
    sqlx::query_scalar::<_, bool>(&query)
        .bind(id)
        .fetch_one(executor)
        .await
}

/// Like [`is_visible`], but takes a `FOR SHARE` lock on the row.
///
/// A concurrent soft delete holds the row lock until it commits; this waits
/// for it and then re-checks the flag, so a caller that sees `true` keeps the
/// row visible until its own transaction ends.
pub async fn lock_visible<'e, T, E>(executor: E, id: DbId) -> Result<bool, sqlx::Error>
where
    T: SoftDeletable,
    E: PgExecutor<'e>,
{
    let query = format!(
        "SELECT id FROM {} WHERE id = $1 AND is_deleted = FALSE FOR SHARE",
        T::TABLE
    );
    let row = sqlx::query_scalar::<_, DbId>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row.is_some())
}

/// Fetch a row regardless of its deleted flag.
pub async fn find_including_deleted<'e, T, E>(executor: E, id: DbId) -> Result<Option<T>, sqlx::Error>
where
    T: SoftDeletable + for<'r> FromRow<'r, PgRow> + Send + Unpin,
    E: PgExecutor<'e>,
{
    let query = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
    sqlx::query_as::<_, T>(&query)
        .bind(id)
        .fetch_optional(executor)
        .await
}
