//! Repository for the `addresses` table.

use sqlx::{PgConnection, PgPool};
use thrush_core::types::DbId;

use crate::models::address::{Address, CreateAddress};
use crate::soft_delete;

const COLUMNS: &str = "id, user_id, name, country, city, state, post_code, address, street, \
                        house_number, floor, unit, is_default, is_deleted, created_at, updated_at";

/// Provides per-user address storage.
pub struct AddressRepo;

impl AddressRepo {
    /// Insert an address for `user_id`.
    ///
    /// A new default address clears the user's previous default first, so a
    /// user never has two.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        input: &CreateAddress,
    ) -> Result<Address, sqlx::Error> {
        let is_default = input.is_default.unwrap_or(true);
        if is_default {
            sqlx::query(
                "UPDATE addresses SET is_default = FALSE
                 WHERE user_id = $1 AND is_default = TRUE AND is_deleted = FALSE",
            )
            .bind(user_id)
            .execute(&mut *conn)
            .await?;
        }

        let query = format!(
            "INSERT INTO addresses
                (user_id, name, country, city, state, post_code, address, street,
                 house_number, floor, unit, is_default)
             VALUES ($1, COALESCE($2, 'home'), $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Address>(&query)
            .bind(user_id)
            .bind(&input.name)
            .bind(&input.country)
            .bind(&input.city)
            .bind(&input.state)
            .bind(&input.post_code)
            .bind(&input.address)
            .bind(&input.street)
            .bind(&input.house_number)
            .bind(&input.floor)
            .bind(&input.unit)
            .bind(is_default)
            .fetch_one(conn)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Address>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM addresses WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Address>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Visible addresses, scoped to one user unless `user_id` is `None`.
    pub async fn list(pool: &PgPool, user_id: Option<DbId>) -> Result<Vec<Address>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM addresses
             WHERE is_deleted = FALSE AND ($1::BIGINT IS NULL OR user_id = $1)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Address>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete::<Address, _>(pool, id).await
    }
}
