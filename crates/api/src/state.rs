use std::sync::Arc;

use mockable::Clock;
use thrush_notify::VerificationSender;

use crate::config::ServerConfig;
use crate::lifecycle::{
    DefaultGroupAssigner, Lifecycle, PermissionPropagator, VerificationCodes, VerificationIssuer,
};

/// Shared application state available to all axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything beyond the pool sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: thrush_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// On-create hooks run by every create handler.
    pub lifecycle: Arc<Lifecycle>,
    pub verification: Arc<VerificationCodes>,
}

impl AppState {
    /// Wire the state and the on-create hooks.
    ///
    /// Hook order: permission propagation, default group, verification code.
    pub fn new(
        pool: thrush_db::DbPool,
        config: ServerConfig,
        clock: Arc<dyn Clock + Send + Sync>,
        sender: Arc<dyn VerificationSender>,
    ) -> Self {
        let lifecycle_config = &config.lifecycle;
        let verification = Arc::new(VerificationCodes::new(lifecycle_config, clock));

        let lifecycle = Lifecycle::new()
            .with_hook(Arc::new(PermissionPropagator::new(
                lifecycle_config.permission_templates.clone(),
            )))
            .with_hook(Arc::new(DefaultGroupAssigner::new(
                lifecycle_config.default_user_group.clone(),
            )))
            .with_hook(Arc::new(VerificationIssuer::new(
                Arc::clone(&verification),
                sender,
            )));

        Self {
            pool,
            config: Arc::new(config),
            lifecycle: Arc::new(lifecycle),
            verification,
        }
    }
}
