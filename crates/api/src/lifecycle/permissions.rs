//! Grants per-object permissions to a newly created entity.
//!
//! For every configured template the codename is resolved against the
//! entity's model name, then granted on the new object to every group that
//! holds the class-wide permission and to the creating user. Each template
//! runs in its own savepoint so one broken template does not cost the others.

use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use thrush_core::error::CoreError;
use thrush_core::permissions::PermissionTemplate;
use thrush_db::error::{RepoError, RepoResult};
use thrush_db::repositories::PermissionRepo;

use super::{CreatedEntity, OnCreateHook};

/// Counts of grants written for one template.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GrantCounts {
    pub groups: usize,
    pub users: usize,
}

pub struct PermissionPropagator {
    templates: Vec<PermissionTemplate>,
}

impl PermissionPropagator {
    pub fn new(templates: Vec<PermissionTemplate>) -> Self {
        Self { templates }
    }

    /// Grant one resolved codename on `created`.
    ///
    /// Fails with [`CoreError::ConfigurationMissing`] when no permission with
    /// that codename exists.
    pub async fn grant_codename(
        conn: &mut PgConnection,
        codename: &str,
        created: &CreatedEntity,
    ) -> RepoResult<GrantCounts> {
        let permission = PermissionRepo::find_by_codename(&mut *conn, codename)
            .await?
            .ok_or_else(|| {
                CoreError::ConfigurationMissing(format!("Permission '{codename}' does not exist"))
            })?;

        let mut counts = GrantCounts::default();

        let groups = PermissionRepo::groups_with_permission(&mut *conn, permission.id).await?;
        for group in &groups {
            let inserted = PermissionRepo::grant_to_group(
                &mut *conn,
                group.id,
                permission.id,
                created.model_name,
                created.object_id,
            )
            .await?;
            if inserted {
                counts.groups += 1;
            }
        }

        if let Some(user_id) = created.creator_id {
            let inserted = PermissionRepo::grant_to_user(
                &mut *conn,
                user_id,
                permission.id,
                created.model_name,
                created.object_id,
            )
            .await?;
            if inserted {
                counts.users += 1;
            }
        }

        Ok(counts)
    }
}

#[async_trait]
impl OnCreateHook for PermissionPropagator {
    fn name(&self) -> &'static str {
        "permission_propagator"
    }

    fn applies_to(&self, _model_name: &str) -> bool {
        true
    }

    async fn in_transaction(
        &self,
        conn: &mut PgConnection,
        created: &CreatedEntity,
    ) -> RepoResult<()> {
        for template in &self.templates {
            let codename = template.resolve(created.model_name);
            let mut savepoint = conn.begin().await?;

            match Self::grant_codename(&mut *savepoint, &codename, created).await {
                Ok(counts) => {
                    savepoint.commit().await?;
                    tracing::debug!(
                        codename = %codename,
                        model_name = created.model_name,
                        object_id = created.object_id,
                        groups = counts.groups,
                        users = counts.users,
                        "Granted object permission",
                    );
                }
                Err(RepoError::Core(CoreError::ConfigurationMissing(msg))) => {
                    savepoint.rollback().await?;
                    tracing::debug!(
                        codename = %codename,
                        model_name = created.model_name,
                        reason = %msg,
                        "Skipping permission template",
                    );
                }
                Err(e) => {
                    savepoint.rollback().await?;
                    tracing::warn!(
                        codename = %codename,
                        model_name = created.model_name,
                        object_id = created.object_id,
                        error = %e,
                        "Permission template failed",
                    );
                }
            }
        }
        Ok(())
    }
}
