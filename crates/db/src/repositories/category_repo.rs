//! Repository for the `categories` table, including placeholder redirect.
//!
//! Deleting a category never orphans the rows that reference it: every
//! [`PlaceholderRule`] with dependents on the deleted row gets its foreign
//! keys rewritten to a root-level placeholder category, created on demand.

use sqlx::{PgConnection, PgPool};
use thrush_core::error::CoreError;
use thrush_core::placeholder::{is_placeholder_name, PlaceholderRule};
use thrush_core::types::DbId;

use crate::error::{RepoError, RepoResult};
use crate::models::category::{Category, CategoryFilter, CreateCategory, UpdateCategory};
use crate::soft_delete;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, parent_id, is_deleted, created_at, updated_at";

/// Provides CRUD and lifecycle operations for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category, returning the created row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, parent_id) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(input.parent_id)
            .fetch_one(conn)
            .await
    }

    /// Find a visible category by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 AND is_deleted = FALSE");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a category by ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        soft_delete::find_including_deleted::<Category, _>(pool, id).await
    }

    /// List visible categories, oldest first.
    pub async fn list(pool: &PgPool, filter: &CategoryFilter) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE is_deleted = FALSE AND ($1::TEXT IS NULL OR name = $1)
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&filter.name)
            .fetch_all(pool)
            .await
    }

    /// Update a visible category. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no visible row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                parent_id = COALESCE($3, parent_id)
             WHERE id = $1 AND is_deleted = FALSE
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(input.parent_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a visible root-level category by name.
    pub async fn find_root_by_name(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories
             WHERE name = $1 AND parent_id IS NULL AND is_deleted = FALSE"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(conn)
            .await
    }

    /// Return the root-level placeholder named `name`, creating it if absent.
    ///
    /// Concurrent callers converge on one row: the insert yields to the
    /// unique index and the loser re-reads the winner's row. Placeholders are
    /// created directly and never receive object permissions.
    pub async fn get_or_create_placeholder(
        conn: &mut PgConnection,
        name: &str,
    ) -> Result<Category, sqlx::Error> {
        if let Some(existing) = Self::find_root_by_name(&mut *conn, name).await? {
            return Ok(existing);
        }

        let query = format!(
            "INSERT INTO categories (name) VALUES ($1)
             ON CONFLICT (name) WHERE parent_id IS NULL AND is_deleted = FALSE DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(&mut *conn)
            .await?;

        match inserted {
            Some(category) => {
                tracing::info!(category_id = category.id, name, "Created placeholder category");
                Ok(category)
            }
            None => Self::find_root_by_name(&mut *conn, name)
                .await?
                .ok_or(sqlx::Error::RowNotFound),
        }
    }

    /// Soft-delete a category and redirect its dependents.
    ///
    /// In one transaction: flag the row, point every rule's dependents at the
    /// rule's placeholder, then rehome child categories. Returns
    /// `false` if the row does not exist or is already deleted. Deleting a
    /// placeholder itself is a conflict.
    pub async fn soft_delete_with_redirect(
        pool: &PgPool,
        id: DbId,
        rules: &[PlaceholderRule],
    ) -> RepoResult<bool> {
        let mut tx = pool.begin().await?;

        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1 FOR UPDATE");
        let target = sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        let target = match target {
            Some(category) if !category.is_deleted => category,
            _ => return Ok(false),
        };

        if target.parent_id.is_none() && is_placeholder_name(rules, &target.name) {
            return Err(CoreError::Conflict(format!(
                "Category '{}' is a placeholder and cannot be deleted",
                target.name
            ))
            .into());
        }

        soft_delete::soft_delete::<Category, _>(&mut *tx, id).await?;

        for rule in rules {
            let has_dependents = sqlx::query_scalar::<_, bool>(&format!(
                "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1)",
                rule.dependent_table, rule.fk_column
            ))
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if !has_dependents {
                continue;
            }

            let placeholder = Self::get_or_create_placeholder(&mut *tx, &rule.placeholder_name).await?;
            let moved = sqlx::query(&format!(
                "UPDATE {table} SET {fk} = $2 WHERE {fk} = $1",
                table = rule.dependent_table,
                fk = rule.fk_column
            ))
            .bind(id)
            .bind(placeholder.id)
            .execute(&mut *tx)
            .await?;

            tracing::info!(
                category_id = id,
                placeholder_id = placeholder.id,
                table = rule.dependent_table,
                moved = moved.rows_affected(),
                "Redirected dependents to placeholder category",
            );
        }

        Self::rehome_children(&mut *tx, id, rules).await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Move the children of a deleted category out from under it.
    ///
    /// Children go to the root unless a visible root category already has
    /// their name; those go under the first rule's placeholder instead.
    async fn rehome_children(
        conn: &mut PgConnection,
        id: DbId,
        rules: &[PlaceholderRule],
    ) -> RepoResult<()> {
        sqlx::query(
            "UPDATE categories c SET parent_id = NULL
             WHERE c.parent_id = $1
               AND (c.is_deleted OR NOT EXISTS (
                    SELECT 1 FROM categories r
                    WHERE r.parent_id IS NULL AND r.is_deleted = FALSE AND r.name = c.name))",
        )
        .bind(id)
        .execute(&mut *conn)
        .await?;

        let Some(collided) = Self::first_child_name(&mut *conn, id).await? else {
            return Ok(());
        };
        let Some(rule) = rules.first() else {
            return Err(child_conflict(&collided));
        };

        let placeholder = Self::get_or_create_placeholder(&mut *conn, &rule.placeholder_name).await?;
        let moved = sqlx::query(
            "UPDATE categories c SET parent_id = $2
             WHERE c.parent_id = $1
               AND NOT EXISTS (
                    SELECT 1 FROM categories s
                    WHERE s.parent_id = $2 AND s.is_deleted = FALSE AND s.name = c.name)",
        )
        .bind(id)
        .bind(placeholder.id)
        .execute(&mut *conn)
        .await?;

        tracing::info!(
            category_id = id,
            placeholder_id = placeholder.id,
            moved = moved.rows_affected(),
            "Moved child categories with taken root names under placeholder",
        );

        match Self::first_child_name(&mut *conn, id).await? {
            Some(name) => Err(child_conflict(&name)),
            None => Ok(()),
        }
    }

    async fn first_child_name(
        conn: &mut PgConnection,
        parent_id: DbId,
    ) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM categories WHERE parent_id = $1 ORDER BY id LIMIT 1",
        )
        .bind(parent_id)
        .fetch_optional(conn)
        .await
    }
}

fn child_conflict(name: &str) -> RepoError {
    CoreError::Conflict(format!(
        "Child category '{name}' clashes with existing categories at the root and under the placeholder"
    ))
    .into()
}
