//! Repository for the `comments` table.

use sqlx::{PgConnection, PgPool};
use thrush_core::error::CoreError;
use thrush_core::types::DbId;

use crate::error::RepoResult;
use crate::models::comment::{Comment, CreateComment, UpdateComment, MAX_MESSAGE_LEN};
use crate::models::post::Post;
use crate::soft_delete;

const COLUMNS: &str = "id, user_id, post_id, message, reply_to_id, is_approved, is_deleted, \
                        created_at, updated_at";

/// Provides CRUD and moderation operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment by `user_id` on a visible post.
    ///
    /// A reply must target a visible comment on the same post.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        post_id: DbId,
        input: &CreateComment,
    ) -> RepoResult<Comment> {
        validate_message(&input.message)?;

        if !soft_delete::is_visible::<Post, _>(&mut *conn, post_id).await? {
            return Err(CoreError::NotFound {
                entity: "post",
                id: post_id,
            }
            .into());
        }

        if let Some(reply_to_id) = input.reply_to_id {
            let same_post = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM comments
                 WHERE id = $1 AND post_id = $2 AND is_deleted = FALSE)",
            )
            .bind(reply_to_id)
            .bind(post_id)
            .fetch_one(&mut *conn)
            .await?;
            if !same_post {
                return Err(CoreError::Validation(format!(
                    "Comment {reply_to_id} is not a comment on post {post_id}"
                ))
                .into());
            }
        }

        let query = format!(
            "INSERT INTO comments (user_id, post_id, message, reply_to_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(user_id)
            .bind(post_id)
            .bind(&input.message)
            .bind(input.reply_to_id)
            .fetch_one(conn)
            .await?;
        Ok(comment)
    }

    /// Find a visible comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List visible comments on a post, oldest first.
    ///
    /// Unapproved comments are included only when `include_unapproved` is set.
    pub async fn list_for_post(
        pool: &PgPool,
        post_id: DbId,
        include_unapproved: bool,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments
             WHERE post_id = $1 AND is_deleted = FALSE AND (is_approved OR $2)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(post_id)
            .bind(include_unapproved)
            .fetch_all(pool)
            .await
    }

    /// Edit a visible comment's message.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateComment,
    ) -> RepoResult<Option<Comment>> {
        if let Some(ref message) = input.message {
            validate_message(message)?;
        }
        let query = format!(
            "UPDATE comments SET message = COALESCE($2, message)
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        let comment = sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(&input.message)
            .fetch_optional(pool)
            .await?;
        Ok(comment)
    }

    /// Mark a visible comment as approved.
    pub async fn approve(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!(
            "UPDATE comments SET is_approved = TRUE
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a comment. Returns `false` if it was missing or already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete::<Comment, _>(pool, id).await
    }
}

fn validate_message(message: &str) -> Result<(), CoreError> {
    if message.trim().is_empty() {
        return Err(CoreError::Validation("Comment message must not be empty".into()));
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err(CoreError::Validation(format!(
            "Comment message must be at most {MAX_MESSAGE_LEN} characters"
        )));
    }
    Ok(())
}
