//! Repository for the `products` table.

use sqlx::{PgConnection, PgPool};
use thrush_core::error::CoreError;
use thrush_core::types::DbId;

use crate::error::RepoResult;
use crate::models::category::Category;
use crate::models::product::{CreateProduct, Product, ProductFilter};
use crate::soft_delete;

const COLUMNS: &str = "id, seller_id, category_id, name, description, product_code, image, \
                        kind, extra, is_deleted, created_at, updated_at";

/// Provides CRUD operations for products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product sold by `seller_id`.
    ///
    /// The kind-specific details are validated before the insert, and the
    /// category is share-locked against concurrent deletes.
    pub async fn create(
        conn: &mut PgConnection,
        seller_id: DbId,
        input: &CreateProduct,
    ) -> RepoResult<Product> {
        input.details.validate()?;
        let extra = input.details.to_extra()?;

        if !soft_delete::lock_visible::<Category, _>(&mut *conn, input.category_id).await? {
            return Err(CoreError::NotFound {
                entity: "category",
                id: input.category_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO products
                (seller_id, category_id, name, description, product_code, image, kind, extra)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(seller_id)
            .bind(input.category_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.product_code)
            .bind(&input.image)
            .bind(input.details.kind())
            .bind(extra)
            .fetch_one(conn)
            .await?;
        Ok(product)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List visible products, oldest first.
    pub async fn list(pool: &PgPool, filter: &ProductFilter) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products
             WHERE is_deleted = FALSE
               AND ($1::TEXT IS NULL OR kind = $1)
               AND ($2::BIGINT IS NULL OR category_id = $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(&filter.kind)
            .bind(filter.category_id)
            .fetch_all(pool)
            .await
    }

    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete::<Product, _>(pool, id).await
    }
}
