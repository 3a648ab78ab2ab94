//! Repository for the `posts` table and its tag links.

use std::collections::HashMap;

use sqlx::{FromRow, PgConnection, PgPool};
use thrush_core::error::CoreError;
use thrush_core::types::DbId;

use crate::error::RepoResult;
use crate::models::category::Category;
use crate::models::post::{CreatePost, Post, PostDetail, PostFilter, PostWithStats, UpdatePost};
use crate::models::tag::Tag;
use crate::soft_delete;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, category_id, title, brief, content, slug, image, is_draft, \
                        previous_id, visited, is_approved, is_deleted, created_at, updated_at";

/// Same columns qualified with the `p` alias, for joined queries.
const P_COLUMNS: &str = "p.id, p.user_id, p.category_id, p.title, p.brief, p.content, p.slug, \
                          p.image, p.is_draft, p.previous_id, p.visited, p.is_approved, \
                          p.is_deleted, p.created_at, p.updated_at";

/// Aggregate counters computed per post.
const STATS: &str = "(SELECT COUNT(*) FROM comments c \
                        WHERE c.post_id = p.id AND c.is_deleted = FALSE AND c.is_approved = TRUE) \
                        AS comments_count, \
                     COALESCE((SELECT AVG(s.value)::FLOAT8 FROM stars s WHERE s.post_id = p.id), 0) \
                        AS stars_average, \
                     (SELECT COUNT(*) FROM post_bookmarks b WHERE b.post_id = p.id) \
                        AS bookmarks_count";

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

#[derive(FromRow)]
struct PostTagRow {
    post_id: DbId,
    #[sqlx(flatten)]
    tag: Tag,
}

/// Provides CRUD operations and read models for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post authored by `user_id` in `category_id`.
    ///
    /// The category and every tag must be visible. The category row stays
    /// share-locked until the caller's transaction ends.
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        category_id: DbId,
        input: &CreatePost,
    ) -> RepoResult<Post> {
        if !soft_delete::lock_visible::<Category, _>(&mut *conn, category_id).await? {
            return Err(CoreError::NotFound {
                entity: "category",
                id: category_id,
            }
            .into());
        }

        let query = format!(
            "INSERT INTO posts
                (user_id, category_id, title, brief, content, slug, image, is_draft, previous_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, FALSE), $9)
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(user_id)
            .bind(category_id)
            .bind(&input.title)
            .bind(&input.brief)
            .bind(&input.content)
            .bind(&input.slug)
            .bind(&input.image)
            .bind(input.is_draft)
            .bind(input.previous_id)
            .fetch_one(&mut *conn)
            .await?;

        Self::set_tags_inner(conn, post.id, &input.tag_ids).await?;
        Ok(post)
    }

    /// Find a visible post by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a visible post with counters and tags.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<PostDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}, {STATS} FROM posts p WHERE p.id = $1 AND p.is_deleted = FALSE"
        );
        let row = sqlx::query_as::<_, PostWithStats>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        match row {
            Some(post) => Ok(Self::attach_tags(pool, vec![post]).await?.pop()),
            None => Ok(None),
        }
    }

    /// List visible posts matching `filter`, oldest first.
    pub async fn list(pool: &PgPool, filter: &PostFilter) -> Result<Vec<PostDetail>, sqlx::Error> {
        let limit = filter.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = filter.offset.unwrap_or(0).max(0);

        // Build dynamic WHERE clauses.
        let mut conditions = vec!["p.is_deleted = FALSE".to_string()];
        let mut bind_idx = 1u32;

        if filter.title.is_some() {
            conditions.push(format!("p.title = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.slug.is_some() {
            conditions.push(format!("p.slug = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.tag.is_some() {
            conditions.push(format!(
                "EXISTS(SELECT 1 FROM post_tags pt JOIN tags t ON t.id = pt.tag_id \
                 WHERE pt.post_id = p.id AND t.is_deleted = FALSE AND t.name = ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if filter.is_draft.is_some() {
            conditions.push(format!("p.is_draft = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.category_id.is_some() {
            conditions.push(format!("p.category_id = ${bind_idx}"));
            bind_idx += 1;
        }

        let query = format!(
            "SELECT {P_COLUMNS}, {STATS} FROM posts p \
             WHERE {where_clause} \
             ORDER BY p.created_at ASC, p.id ASC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            where_clause = conditions.join(" AND "),
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, PostWithStats>(&query);

        // Bind dynamic parameters in order.
        if let Some(ref title) = filter.title {
            q = q.bind(title);
        }
        if let Some(ref slug) = filter.slug {
            q = q.bind(slug);
        }
        if let Some(ref tag) = filter.tag {
            q = q.bind(tag);
        }
        if let Some(is_draft) = filter.is_draft {
            q = q.bind(is_draft);
        }
        if let Some(category_id) = filter.category_id {
            q = q.bind(category_id);
        }

        let rows = q.bind(limit).bind(offset).fetch_all(pool).await?;
        Self::attach_tags(pool, rows).await
    }

    /// Visible posts bookmarked by `user_id`, most recently bookmarked first.
    pub async fn list_bookmarked_by(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<PostDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {P_COLUMNS}, {STATS} FROM posts p
             JOIN post_bookmarks pb ON pb.post_id = p.id
             WHERE pb.user_id = $1 AND p.is_deleted = FALSE
             ORDER BY pb.created_at DESC, p.id DESC"
        );
        let rows = sqlx::query_as::<_, PostWithStats>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await?;
        Self::attach_tags(pool, rows).await
    }

    /// Update a visible post. Only non-`None` fields are applied; `tag_ids`
    /// replaces the tag set when present.
    ///
    /// Returns `None` if no visible row with the given `id` exists.
    pub async fn update(pool: &PgPool, id: DbId, input: &UpdatePost) -> RepoResult<Option<Post>> {
        let mut tx = pool.begin().await?;

        if let Some(category_id) = input.category_id {
            if !soft_delete::lock_visible::<Category, _>(&mut *tx, category_id).await? {
                return Err(CoreError::NotFound {
                    entity: "category",
                    id: category_id,
                }
                .into());
            }
        }

        let query = format!(
            "UPDATE posts SET
                title = COALESCE($2, title),
                brief = COALESCE($3, brief),
                content = COALESCE($4, content),
                slug = COALESCE($5, slug),
                image = COALESCE($6, image),
                is_draft = COALESCE($7, is_draft),
                category_id = COALESCE($8, category_id)
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        let post = sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.brief)
            .bind(&input.content)
            .bind(&input.slug)
            .bind(&input.image)
            .bind(input.is_draft)
            .bind(input.category_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(post) = post else {
            return Ok(None);
        };

        if let Some(ref tag_ids) = input.tag_ids {
            sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            Self::set_tags_inner(&mut *tx, id, tag_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(post))
    }

    /// Bump the view counter of a visible post.
    pub async fn increment_visited(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE posts SET visited = visited + 1 WHERE id = $1 AND is_deleted = FALSE")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Soft-delete a post. Returns `false` if it was missing or already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        soft_delete::soft_delete::<Post, _>(pool, id).await
    }

    /// Find a post by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Post>, sqlx::Error> {
        soft_delete::find_including_deleted::<Post, _>(pool, id).await
    }

    // ── Internal helpers ─────────────────────────────────────────────

    /// Link `tag_ids` to a post. Every tag must exist and be visible.
    async fn set_tags_inner(
        conn: &mut PgConnection,
        post_id: DbId,
        tag_ids: &[DbId],
    ) -> RepoResult<()> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        let mut unique = tag_ids.to_vec();
        unique.sort_unstable();
        unique.dedup();

        let linked = sqlx::query(
            "INSERT INTO post_tags (post_id, tag_id)
             SELECT $1, t.id FROM tags t WHERE t.id = ANY($2) AND t.is_deleted = FALSE
             ON CONFLICT DO NOTHING",
        )
        .bind(post_id)
        .bind(&unique)
        .execute(&mut *conn)
        .await?;

        if linked.rows_affected() as usize != unique.len() {
            return Err(CoreError::Validation("One or more tags do not exist".into()).into());
        }
        Ok(())
    }

    async fn attach_tags(
        pool: &PgPool,
        posts: Vec<PostWithStats>,
    ) -> Result<Vec<PostDetail>, sqlx::Error> {
        let ids: Vec<DbId> = posts.iter().map(|p| p.post.id).collect();
        let rows = sqlx::query_as::<_, PostTagRow>(
            "SELECT pt.post_id, t.id, t.name, t.is_deleted, t.created_at, t.updated_at
             FROM post_tags pt
             JOIN tags t ON t.id = pt.tag_id
             WHERE pt.post_id = ANY($1) AND t.is_deleted = FALSE
             ORDER BY t.name",
        )
        .bind(&ids)
        .fetch_all(pool)
        .await?;

        let mut by_post: HashMap<DbId, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_post.entry(row.post_id).or_default().push(row.tag);
        }

        Ok(posts
            .into_iter()
            .map(|post| {
                let tags = by_post.remove(&post.post.id).unwrap_or_default();
                PostDetail { post, tags }
            })
            .collect())
    }
}
