//! Repository for the `prices` table.

use sqlx::{PgConnection, PgPool};
use thrush_core::error::CoreError;
use thrush_core::types::DbId;

use crate::error::RepoResult;
use crate::models::price::{CreatePrice, Price};
use crate::models::product::Product;
use crate::soft_delete;

const COLUMNS: &str = "id, product_id, amount, discount, starts_at, ends_at, is_deleted, \
                        created_at, updated_at";

/// Provides price history for products.
pub struct PriceRepo;

impl PriceRepo {
    pub async fn create(
        conn: &mut PgConnection,
        product_id: DbId,
        input: &CreatePrice,
    ) -> RepoResult<Price> {
        if input.amount < 0 {
            return Err(CoreError::Validation("amount must not be negative".into()).into());
        }
        if let Some(discount) = input.discount {
            if !(0..=100).contains(&discount) {
                return Err(
                    CoreError::Validation("discount must be between 0 and 100".into()).into(),
                );
            }
        }
        if let (Some(starts_at), Some(ends_at)) = (input.starts_at, input.ends_at) {
            if ends_at <= starts_at {
                return Err(CoreError::Validation("ends_at must be after starts_at".into()).into());
            }
        }

        if !soft_delete::is_visible::<Product, _>(&mut *conn, product_id).await? {
            return Err(CoreError::NotFound {
                entity: "product",
                id: product_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO prices (product_id, amount, discount, starts_at, ends_at)
             VALUES ($1, $2, COALESCE($3, 0), COALESCE($4, NOW()), $5)
             RETURNING {COLUMNS}"
        );
        let price = sqlx::query_as::<_, Price>(&query)
            .bind(product_id)
            .bind(input.amount)
            .bind(input.discount)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_one(conn)
            .await?;
        Ok(price)
    }

    /// Visible prices for a product, newest window first.
    pub async fn list_for_product(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<Price>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prices
             WHERE product_id = $1 AND is_deleted = FALSE
             ORDER BY starts_at DESC, id DESC"
        );
        sqlx::query_as::<_, Price>(&query)
            .bind(product_id)
            .fetch_all(pool)
            .await
    }
}
