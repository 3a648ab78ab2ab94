//! Repository for permissions and their class-wide and per-object grants.
//!
//! Class-wide grants (`group_permissions`, `user_permissions`) say who may act
//! on a model at all. Object grants (`group_object_permissions`,
//! `user_object_permissions`) attach a permission to one row, identified by
//! `(model_name, object_id)`. Grant inserts are idempotent.

use sqlx::{PgExecutor, PgPool};
use thrush_core::types::DbId;

use crate::models::permission::{Group, ObjectGrant, Permission};

const COLUMNS: &str = "id, codename, name, created_at";

/// Provides permission lookups and grant management.
pub struct PermissionRepo;

impl PermissionRepo {
    /// Find a permission by codename, e.g. `"post.view"`.
    pub async fn find_by_codename<'e, E: PgExecutor<'e>>(
        executor: E,
        codename: &str,
    ) -> Result<Option<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions WHERE codename = $1");
        sqlx::query_as::<_, Permission>(&query)
            .bind(codename)
            .fetch_optional(executor)
            .await
    }

    /// Every group holding the class-wide permission, ordered by id.
    pub async fn groups_with_permission<'e, E: PgExecutor<'e>>(
        executor: E,
        permission_id: DbId,
    ) -> Result<Vec<Group>, sqlx::Error> {
        sqlx::query_as::<_, Group>(
            "SELECT g.id, g.name, g.created_at FROM groups g
             JOIN group_permissions gp ON gp.group_id = g.id
             WHERE gp.permission_id = $1
             ORDER BY g.id",
        )
        .bind(permission_id)
        .fetch_all(executor)
        .await
    }

    /// Grant a permission class-wide to a group.
    pub async fn grant_class_to_group<'e, E: PgExecutor<'e>>(
        executor: E,
        group_id: DbId,
        permission_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO group_permissions (group_id, permission_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(group_id)
        .bind(permission_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Grant a permission class-wide to a single user.
    pub async fn grant_class_to_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: DbId,
        permission_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_permissions (user_id, permission_id) VALUES ($1, $2)
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(permission_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Grant a permission on one object to a group.
    ///
    /// Returns `false` if the grant already existed.
    pub async fn grant_to_group<'e, E: PgExecutor<'e>>(
        executor: E,
        group_id: DbId,
        permission_id: DbId,
        model_name: &str,
        object_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO group_object_permissions (group_id, permission_id, model_name, object_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_group_object_permissions DO NOTHING",
        )
        .bind(group_id)
        .bind(permission_id)
        .bind(model_name)
        .bind(object_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Grant a permission on one object to a user.
    ///
    /// Returns `false` if the grant already existed.
    pub async fn grant_to_user<'e, E: PgExecutor<'e>>(
        executor: E,
        user_id: DbId,
        permission_id: DbId,
        model_name: &str,
        object_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO user_object_permissions (user_id, permission_id, model_name, object_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_user_object_permissions DO NOTHING",
        )
        .bind(user_id)
        .bind(permission_id)
        .bind(model_name)
        .bind(object_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether the user holds `codename` class-wide, directly or through a group.
    pub async fn user_has_permission(
        pool: &PgPool,
        user_id: DbId,
        codename: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM user_permissions up
                JOIN permissions p ON p.id = up.permission_id
                WHERE up.user_id = $1 AND p.codename = $2
                UNION ALL
                SELECT 1 FROM user_groups ug
                JOIN group_permissions gp ON gp.group_id = ug.group_id
                JOIN permissions p ON p.id = gp.permission_id
                WHERE ug.user_id = $1 AND p.codename = $2
             )",
        )
        .bind(user_id)
        .bind(codename)
        .fetch_one(pool)
        .await
    }

    /// Whether the user holds `codename` on one object, directly or through a group.
    pub async fn user_has_object_permission(
        pool: &PgPool,
        user_id: DbId,
        codename: &str,
        model_name: &str,
        object_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM user_object_permissions uop
                JOIN permissions p ON p.id = uop.permission_id
                WHERE uop.user_id = $1 AND p.codename = $2
                  AND uop.model_name = $3 AND uop.object_id = $4
                UNION ALL
                SELECT 1 FROM user_groups ug
                JOIN group_object_permissions gop ON gop.group_id = ug.group_id
                JOIN permissions p ON p.id = gop.permission_id
                WHERE ug.user_id = $1 AND p.codename = $2
                  AND gop.model_name = $3 AND gop.object_id = $4
             )",
        )
        .bind(user_id)
        .bind(codename)
        .bind(model_name)
        .bind(object_id)
        .fetch_one(pool)
        .await
    }

    /// Object grants held directly by a user on one object.
    pub async fn user_object_grants(
        pool: &PgPool,
        user_id: DbId,
        model_name: &str,
        object_id: DbId,
    ) -> Result<Vec<ObjectGrant>, sqlx::Error> {
        sqlx::query_as::<_, ObjectGrant>(
            "SELECT p.codename, uop.model_name, uop.object_id
             FROM user_object_permissions uop
             JOIN permissions p ON p.id = uop.permission_id
             WHERE uop.user_id = $1 AND uop.model_name = $2 AND uop.object_id = $3
             ORDER BY p.codename",
        )
        .bind(user_id)
        .bind(model_name)
        .bind(object_id)
        .fetch_all(pool)
        .await
    }

    /// Object grants held by a group on one object.
    pub async fn group_object_grants(
        pool: &PgPool,
        group_id: DbId,
        model_name: &str,
        object_id: DbId,
    ) -> Result<Vec<ObjectGrant>, sqlx::Error> {
        sqlx::query_as::<_, ObjectGrant>(
            "SELECT p.codename, gop.model_name, gop.object_id
             FROM group_object_permissions gop
             JOIN permissions p ON p.id = gop.permission_id
             WHERE gop.group_id = $1 AND gop.model_name = $2 AND gop.object_id = $3
             ORDER BY p.codename",
        )
        .bind(group_id)
        .bind(model_name)
        .bind(object_id)
        .fetch_all(pool)
        .await
    }

    /// Total object grants (user and group) attached to one object.
    pub async fn count_object_grants(
        pool: &PgPool,
        model_name: &str,
        object_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT
                (SELECT COUNT(*) FROM user_object_permissions
                  WHERE model_name = $1 AND object_id = $2)
              + (SELECT COUNT(*) FROM group_object_permissions
                  WHERE model_name = $1 AND object_id = $2)",
        )
        .bind(model_name)
        .bind(object_id)
        .fetch_one(pool)
        .await
    }

    /// Create a permission. Used to extend the seeded set.
    pub async fn create(pool: &PgPool, codename: &str, name: &str) -> Result<Permission, sqlx::Error> {
        let query = format!(
            "INSERT INTO permissions (codename, name) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(codename)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// Remove a permission and every grant referencing it.
    pub async fn delete_by_codename(pool: &PgPool, codename: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM permissions WHERE codename = $1")
            .bind(codename)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
