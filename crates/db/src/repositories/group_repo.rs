//! Repository for the `groups` table.

use sqlx::{PgExecutor, PgPool};

use crate::models::permission::Group;

const COLUMNS: &str = "id, name, created_at";

/// Provides lookups and creation for groups.
pub struct GroupRepo;

impl GroupRepo {
    /// Find a group by name (case-sensitive).
    pub async fn find_by_name<'e, E: PgExecutor<'e>>(
        executor: E,
        name: &str,
    ) -> Result<Option<Group>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM groups WHERE name = $1");
        sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .fetch_optional(executor)
            .await
    }

    pub async fn create(pool: &PgPool, name: &str) -> Result<Group, sqlx::Error> {
        let query = format!("INSERT INTO groups (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Group>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Delete a group by name, dropping its memberships and grants.
    pub async fn delete_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM groups WHERE name = $1")
            .bind(name)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
