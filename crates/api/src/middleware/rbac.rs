//! Authorization checks.
//!
//! Superusers pass every check. Everyone else needs either a class-wide
//! permission (held directly or through a group) or, for object checks, a
//! grant on that specific object.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use sqlx::PgPool;
use thrush_core::entity::PermissionBearing;
use thrush_core::error::CoreError;
use thrush_core::permissions::codename;
use thrush_core::types::DbId;
use thrush_db::repositories::PermissionRepo;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Requires a superuser. Rejects with 403 Forbidden otherwise.
pub struct RequireSuperuser(pub AuthUser);

impl FromRequestParts<AppState> for RequireSuperuser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.is_superuser {
            return Err(AppError::Core(CoreError::Forbidden(
                "Superuser required".into(),
            )));
        }
        Ok(RequireSuperuser(user))
    }
}

impl AuthUser {
    /// Whether the caller holds `codename` class-wide.
    pub async fn has_permission(&self, pool: &PgPool, codename: &str) -> AppResult<bool> {
        if self.is_superuser {
            return Ok(true);
        }
        Ok(PermissionRepo::user_has_permission(pool, self.user_id, codename).await?)
    }

    /// Fail with 403 unless the caller holds `codename` class-wide.
    pub async fn require_permission(&self, pool: &PgPool, codename: &str) -> AppResult<()> {
        if self.has_permission(pool, codename).await? {
            Ok(())
        } else {
            Err(forbidden(codename))
        }
    }

    /// Fail with 403 unless the caller may perform `action` on object `id`
    /// of `T`.
    ///
    /// Class-wide grants do not satisfy an object check.
    pub async fn require_object_permission<T: PermissionBearing>(
        &self,
        pool: &PgPool,
        action: &str,
        id: DbId,
    ) -> AppResult<()> {
        if self.is_superuser {
            return Ok(());
        }
        let codename = codename(T::MODEL_NAME, action);
        let granted = PermissionRepo::user_has_object_permission(
            pool,
            self.user_id,
            &codename,
            T::MODEL_NAME,
            id,
        )
        .await?;

        if granted {
            Ok(())
        } else {
            tracing::debug!(user_id = self.user_id, codename = %codename, object_id = id, "Object permission denied");
            Err(forbidden(&codename))
        }
    }
}

fn forbidden(codename: &str) -> AppError {
    AppError::Core(CoreError::Forbidden(format!(
        "Permission '{codename}' required"
    )))
}
