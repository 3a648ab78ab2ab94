//! Repository for the `users` table and group membership.

use sqlx::{PgConnection, PgExecutor, PgPool};
use thrush_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, mobile, password_hash, first_name, last_name, \
                        image, is_active, is_superuser, mobile_verified, email_verified, \
                        created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// Takes a connection so the insert can share a transaction with the
    /// on-create hooks.
    pub async fn create(conn: &mut PgConnection, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users
                (username, email, mobile, password_hash, first_name, last_name, image,
                 is_active, is_superuser)
             VALUES ($1, $2, $3, $4, COALESCE($5, ''), COALESCE($6, ''), $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.mobile)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(&input.image)
            .bind(input.is_active)
            .bind(input.is_superuser)
            .fetch_one(conn)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Activate an account after its verification code was confirmed.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn mark_verified(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET is_active = TRUE, mobile_verified = TRUE
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Add a user to a group. Returns `false` if the membership already existed.
    pub async fn add_to_group<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: DbId,
        group_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_groups (user_id, group_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(group_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Names of every group the user belongs to, alphabetically.
    pub async fn group_names(pool: &PgPool, user_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT g.name FROM groups g
             JOIN user_groups ug ON ug.group_id = g.id
             WHERE ug.user_id = $1
             ORDER BY g.name",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
