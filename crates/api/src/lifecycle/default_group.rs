use async_trait::async_trait;
use sqlx::PgConnection;
use thrush_db::error::RepoResult;
use thrush_db::repositories::{GroupRepo, UserRepo};

use super::{CreatedEntity, OnCreateHook};

/// Puts every new user into the configured default group.
///
/// A missing group is a deployment problem: it is logged and the user is
/// still created.
pub struct DefaultGroupAssigner {
    group_name: String,
}

impl DefaultGroupAssigner {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
        }
    }
}

#[async_trait]
impl OnCreateHook for DefaultGroupAssigner {
    fn name(&self) -> &'static str {
        "default_group_assigner"
    }

    fn applies_to(&self, model_name: &str) -> bool {
        model_name == "user"
    }

    async fn in_transaction(
        &self,
        conn: &mut PgConnection,
        created: &CreatedEntity,
    ) -> RepoResult<()> {
        let Some(group) = GroupRepo::find_by_name(&mut *conn, &self.group_name).await? else {
            tracing::error!(
                group = %self.group_name,
                user_id = created.object_id,
                "Default user group does not exist; user left without a group",
            );
            return Ok(());
        };

        UserRepo::add_to_group(&mut *conn, created.object_id, group.id).await?;
        tracing::debug!(group = %group.name, user_id = created.object_id, "Added user to default group");
        Ok(())
    }
}
