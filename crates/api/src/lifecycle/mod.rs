//! On-create lifecycle hooks.
//!
//! A [`Lifecycle`] holds an ordered list of [`OnCreateHook`]s. Handlers that
//! create a permission-bearing entity open a transaction, insert the row and
//! hand the transaction to [`Lifecycle::commit_created`], which:
//!
//! 1. runs every applicable hook's [`OnCreateHook::in_transaction`] step, each
//!    inside its own savepoint;
//! 2. commits;
//! 3. runs every applicable hook's [`OnCreateHook::after_commit`] step.
//!
//! A failing hook is logged and rolled back to its savepoint. It never undoes
//! the primary write.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Connection, PgConnection, PgPool, Postgres, Transaction};
use thrush_core::entity::PermissionBearing;
use thrush_core::types::DbId;
use thrush_db::error::RepoResult;

pub mod default_group;
pub mod permissions;
pub mod verification;

pub use default_group::DefaultGroupAssigner;
pub use permissions::PermissionPropagator;
pub use verification::{VerificationCodes, VerificationIssuer};

/// Identity of a freshly inserted row, as seen by the hooks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedEntity {
    pub model_name: &'static str,
    pub object_id: DbId,
    /// User receiving per-object grants, if any.
    pub creator_id: Option<DbId>,
}

impl CreatedEntity {
    pub fn of<T: PermissionBearing>(entity: &T) -> Self {
        Self {
            model_name: T::MODEL_NAME,
            object_id: entity.id(),
            creator_id: entity.creator_id(),
        }
    }

    /// Override the creating user for models that do not record one.
    pub fn with_creator(mut self, user_id: DbId) -> Self {
        self.creator_id = Some(user_id);
        self
    }
}

/// A side effect attached to entity creation.
#[async_trait]
pub trait OnCreateHook: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Whether the hook fires for entities of `model_name`.
    fn applies_to(&self, model_name: &str) -> bool;

    /// Work that must commit together with the created row.
    async fn in_transaction(
        &self,
        _conn: &mut PgConnection,
        _created: &CreatedEntity,
    ) -> RepoResult<()> {
        Ok(())
    }

    /// Work that runs once the row is durable.
    async fn after_commit(&self, _pool: &PgPool, _created: &CreatedEntity) -> RepoResult<()> {
        Ok(())
    }
}

/// Ordered registry of on-create hooks.
#[derive(Clone, Default)]
pub struct Lifecycle {
    hooks: Vec<Arc<dyn OnCreateHook>>,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a hook. Hooks run in registration order.
    pub fn with_hook(mut self, hook: Arc<dyn OnCreateHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    /// Run the transactional hook steps, commit, then run the post-commit
    /// steps.
    ///
    /// Only errors from the surrounding transaction itself (savepoint
    /// management, commit) are returned.
    pub async fn commit_created<T: PermissionBearing>(
        &self,
        pool: &PgPool,
        tx: Transaction<'static, Postgres>,
        entity: &T,
    ) -> Result<(), sqlx::Error> {
        self.commit_as(pool, tx, CreatedEntity::of(entity)).await
    }

    /// Like [`Lifecycle::commit_created`] with an explicit [`CreatedEntity`].
    pub async fn commit_as(
        &self,
        pool: &PgPool,
        mut tx: Transaction<'static, Postgres>,
        created: CreatedEntity,
    ) -> Result<(), sqlx::Error> {
        self.run_in_transaction(&mut *tx, &created).await?;
        tx.commit().await?;
        self.run_after_commit(pool, &created).await;
        Ok(())
    }

    /// Run each applicable hook's transactional step inside a savepoint.
    pub async fn run_in_transaction(
        &self,
        conn: &mut PgConnection,
        created: &CreatedEntity,
    ) -> Result<(), sqlx::Error> {
        for hook in self.applicable(created.model_name) {
            let mut savepoint = conn.begin().await?;
            match hook.in_transaction(&mut *savepoint, created).await {
                Ok(()) => savepoint.commit().await?,
                Err(e) => {
                    tracing::warn!(
                        hook = hook.name(),
                        model_name = created.model_name,
                        object_id = created.object_id,
                        error = %e,
                        "On-create hook failed; rolled back its changes",
                    );
                    savepoint.rollback().await?;
                }
            }
        }
        Ok(())
    }

    /// Run each applicable hook's post-commit step. Failures are logged.
    pub async fn run_after_commit(&self, pool: &PgPool, created: &CreatedEntity) {
        for hook in self.applicable(created.model_name) {
            if let Err(e) = hook.after_commit(pool, created).await {
                tracing::error!(
                    hook = hook.name(),
                    model_name = created.model_name,
                    object_id = created.object_id,
                    error = %e,
                    "Post-commit hook failed",
                );
            }
        }
    }

    fn applicable<'a>(
        &'a self,
        model_name: &'a str,
    ) -> impl Iterator<Item = &'a Arc<dyn OnCreateHook>> + 'a {
        self.hooks
            .iter()
            .filter(move |hook| hook.applies_to(model_name))
    }
}
