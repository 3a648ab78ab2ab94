//! Repository for the `post_bookmarks` and `product_bookmarks` edge tables.
//!
//! Adding an existing bookmark is a conflict and removing a missing one is
//! not-found; neither case writes anything.

use sqlx::PgPool;
use thrush_core::error::CoreError;
use thrush_core::types::DbId;

use crate::error::RepoResult;
use crate::models::bookmark::{PostBookmark, ProductBookmark};
use crate::models::post::Post;
use crate::models::product::Product;
use crate::soft_delete;

/// Provides bookmark add/remove for posts and products.
pub struct BookmarkRepo;

impl BookmarkRepo {
    /// Bookmark a visible post for `user_id`.
    pub async fn add_post(pool: &PgPool, user_id: DbId, post_id: DbId) -> RepoResult<PostBookmark> {
        if !soft_delete::is_visible::<Post, _>(pool, post_id).await? {
            return Err(CoreError::NotFound {
                entity: "post",
                id: post_id,
            }
            .into());
        }

        let inserted = sqlx::query_as::<_, PostBookmark>(
            "INSERT INTO post_bookmarks (post_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING
             RETURNING post_id, user_id, created_at",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        inserted.ok_or_else(|| CoreError::Conflict("The post is already bookmarked".into()).into())
    }

    /// Remove the caller's bookmark on a post.
    pub async fn remove_post(pool: &PgPool, user_id: DbId, post_id: DbId) -> RepoResult<()> {
        if !soft_delete::is_visible::<Post, _>(pool, post_id).await? {
            return Err(CoreError::NotFound {
                entity: "post",
                id: post_id,
            }
            .into());
        }

        let result = sqlx::query("DELETE FROM post_bookmarks WHERE post_id = $1 AND user_id = $2")
            .bind(post_id)
            .bind(user_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound {
                entity: "bookmark",
                id: post_id,
            }
            .into());
        }
        Ok(())
    }

    /// Bookmark a visible product for `user_id`.
    pub async fn add_product(
        pool: &PgPool,
        user_id: DbId,
        product_id: DbId,
    ) -> RepoResult<ProductBookmark> {
        if !soft_delete::is_visible::<Product, _>(pool, product_id).await? {
            return Err(CoreError::NotFound {
                entity: "product",
                id: product_id,
            }
            .into());
        }

        let inserted = sqlx::query_as::<_, ProductBookmark>(
            "INSERT INTO product_bookmarks (product_id, user_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING
             RETURNING product_id, user_id, created_at",
        )
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        inserted
            .ok_or_else(|| CoreError::Conflict("The product is already bookmarked".into()).into())
    }

    /// Remove the caller's bookmark on a product.
    pub async fn remove_product(pool: &PgPool, user_id: DbId, product_id: DbId) -> RepoResult<()> {
        if !soft_delete::is_visible::<Product, _>(pool, product_id).await? {
            return Err(CoreError::NotFound {
                entity: "product",
                id: product_id,
            }
            .into());
        }

        let result =
            sqlx::query("DELETE FROM product_bookmarks WHERE product_id = $1 AND user_id = $2")
                .bind(product_id)
                .bind(user_id)
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotFound {
                entity: "bookmark",
                id: product_id,
            }
            .into());
        }
        Ok(())
    }

    /// Number of users who bookmarked a post.
    pub async fn count_for_post(pool: &PgPool, post_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM post_bookmarks WHERE post_id = $1")
            .bind(post_id)
            .fetch_one(pool)
            .await
    }
}
