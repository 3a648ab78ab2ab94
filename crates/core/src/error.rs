use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Entity not found: {entity} '{key}'")]
    NotFoundByKey { entity: &'static str, key: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Deployment-time misconfiguration (missing permission, group, key).
    /// Logged by the caller, never returned to an HTTP client.
    #[error("Configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
